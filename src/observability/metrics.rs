//! Metrics collection and exposition.
//!
//! # Metrics
//! - `menu_http_requests_total` (counter): requests by method, route, status
//! - `menu_http_request_duration_seconds` (histogram): latency by method, route
//! - `menu_fault_injections_total` (counter): simulated upstream failures
//!
//! Routes are labelled by template, never by raw path, so arbitrary item
//! ids cannot blow up label cardinality.

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::{Method, StatusCode};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Map a request path to its route template.
pub fn route_label(path: &str) -> &'static str {
    match path {
        "/health" => "/health",
        "/api/menu" => "/api/menu",
        p if p.starts_with("/api/menu/") => "/api/menu/{id}",
        _ => "unmatched",
    }
}

pub fn record_request(method: &Method, path: &str, status: StatusCode, duration: Duration) {
    let route = route_label(path);
    ::metrics::counter!(
        "menu_http_requests_total",
        "method" => method.to_string(),
        "route" => route,
        "status" => status.as_u16().to_string()
    )
    .increment(1);
    ::metrics::histogram!(
        "menu_http_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route
    )
    .record(duration.as_secs_f64());
}

pub fn record_fault_injection() {
    ::metrics::counter!("menu_fault_injections_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_label() {
        assert_eq!(route_label("/health"), "/health");
        assert_eq!(route_label("/api/menu"), "/api/menu");
        assert_eq!(route_label("/api/menu/"), "/api/menu/{id}");
        assert_eq!(route_label("/api/menu/123"), "/api/menu/{id}");
        assert_eq!(route_label("/api/menus"), "unmatched");
        assert_eq!(route_label("/"), "unmatched");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_request(&Method::GET, "/health", StatusCode::OK, Duration::from_millis(1));
        record_fault_injection();
    }
}

//! Per-request spans.
//!
//! The span is opened by the access log middleware and handler spans nest
//! under it. With tracing disabled the middleware gets `Span::none()`, and
//! recording into it is a no-op.

use axum::http::{Method, StatusCode};
use tracing::{field::Empty, Span};

use crate::http::response::RequestNote;

/// Open the span for one request, or a disabled span.
pub fn request_span(enabled: bool, method: &Method, path: &str, request_id: Option<&str>) -> Span {
    if !enabled {
        return Span::none();
    }
    tracing::info_span!(
        "http.request",
        method = %method,
        path = %path,
        request_id = request_id,
        status = Empty,
        menu.item.id = Empty,
        error = Empty,
        error.message = Empty,
    )
}

/// Record the final status and handler diagnostics on `span`.
pub fn record_outcome(span: &Span, status: StatusCode, note: &RequestNote) {
    span.record("status", status.as_u16());
    if let Some(id) = note.item_id.as_deref() {
        span.record("menu.item.id", id);
    }
    if status.is_server_error() || status.is_client_error() || note.error.is_some() {
        span.record("error", true);
    }
    if let Some(message) = note.error.as_deref() {
        span.record("error.message", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_span_is_none() {
        let span = request_span(false, &Method::GET, "/health", None);
        assert!(span.is_none());
        record_outcome(&span, StatusCode::OK, &RequestNote::default());
    }

    #[test]
    fn test_record_outcome_on_enabled_span() {
        let span = request_span(true, &Method::GET, "/api/menu/9", Some("abc"));
        record_outcome(
            &span,
            StatusCode::NOT_FOUND,
            &RequestNote::item("9").with_error("menu item not found: 9"),
        );
    }
}

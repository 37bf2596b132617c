//! Access logging and request spans.
//!
//! Observes every request without touching its response: records method,
//! path, final status and elapsed time, then hands an `AccessRecord` to the
//! configured `AccessLog` sink.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

use crate::http::response::RequestNote;
use crate::observability::{metrics, tracing as spans};

/// Log severity derived from a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl Severity {
    pub fn from_status(status: StatusCode) -> Self {
        if status.is_server_error() {
            Severity::Error
        } else if status.is_client_error() {
            Severity::Warn
        } else {
            Severity::Info
        }
    }
}

/// Records the status of the response passing through it.
///
/// Reports 200 until a status has been observed; later observations
/// replace earlier ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusCapture {
    status: Option<StatusCode>,
}

impl StatusCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    /// Pass `response` through, recording its status.
    pub fn observe(&mut self, response: Response) -> Response {
        self.record(response.status());
        response
    }

    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }
}

/// One completed request.
#[derive(Debug, Clone)]
pub struct AccessRecord {
    pub severity: Severity,
    pub method: Method,
    pub path: String,
    pub status: StatusCode,
    pub duration: Duration,
    pub message: &'static str,
    pub request_id: Option<String>,
    pub remote_addr: Option<SocketAddr>,
    pub user_agent: Option<String>,
    pub item_id: Option<String>,
    pub error: Option<String>,
}

/// Sink for access records. Must not block.
pub trait AccessLog: Send + Sync {
    fn record(&self, record: &AccessRecord);
}

/// Emits access records as `tracing` events at their severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAccessLog;

macro_rules! emit_access {
    ($level:ident, $r:expr) => {
        tracing::$level!(
            request_id = $r.request_id.as_deref(),
            method = %$r.method,
            path = %$r.path,
            status = $r.status.as_u16(),
            duration_ms = $r.duration.as_secs_f64() * 1000.0,
            remote_addr = $r.remote_addr.as_ref().map(tracing::field::display),
            user_agent = $r.user_agent.as_deref(),
            item_id = $r.item_id.as_deref(),
            error = $r.error.as_deref(),
            "{}",
            $r.message
        )
    };
}

impl AccessLog for TracingAccessLog {
    fn record(&self, record: &AccessRecord) {
        match record.severity {
            Severity::Error => emit_access!(error, record),
            Severity::Warn => emit_access!(warn, record),
            Severity::Info => emit_access!(info, record),
        }
    }
}

/// State for `access_log_middleware`.
#[derive(Clone)]
pub struct AccessLogState {
    pub sink: Arc<dyn AccessLog>,
    pub tracing_enabled: bool,
}

impl AccessLogState {
    pub fn new(sink: Arc<dyn AccessLog>, tracing_enabled: bool) -> Self {
        Self {
            sink,
            tracing_enabled,
        }
    }
}

pub async fn access_log_middleware(
    State(state): State<AccessLogState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let span = spans::request_span(
        state.tracing_enabled,
        &method,
        &path,
        request_id.as_deref(),
    );

    let mut capture = StatusCapture::new();
    let response = capture.observe(next.run(request).instrument(span.clone()).await);
    let status = capture.status();
    let duration = start.elapsed();

    let note = response
        .extensions()
        .get::<RequestNote>()
        .cloned()
        .unwrap_or_default();
    spans::record_outcome(&span, status, &note);

    state.sink.record(&AccessRecord {
        severity: Severity::from_status(status),
        method: method.clone(),
        path: path.clone(),
        status,
        duration,
        message: "HTTP request",
        request_id,
        remote_addr,
        user_agent,
        item_id: note.item_id,
        error: note.error,
    });
    metrics::record_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, response::IntoResponse, routing::get, Json, Router};
    use std::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Default)]
    struct Recorder {
        records: Mutex<Vec<AccessRecord>>,
    }

    impl AccessLog for Recorder {
        fn record(&self, record: &AccessRecord) {
            self.records.lock().unwrap().push(record.clone());
        }
    }

    fn app(recorder: Arc<Recorder>) -> Router {
        Router::new()
            .route("/implicit", get(|| async { Json(serde_json::json!({"ok": true})) }))
            .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "gone") }))
            .route("/broken", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))
            .route(
                "/teapot",
                get(|| async {
                    let response = (StatusCode::IM_A_TEAPOT, "short and stout").into_response();
                    RequestNote::item("7").with_error("no coffee").attach(response)
                }),
            )
            .layer(middleware::from_fn_with_state(
                AccessLogState::new(recorder, true),
                access_log_middleware,
            ))
    }

    async fn call(recorder: &Arc<Recorder>, uri: &str) -> (StatusCode, AccessRecord) {
        let response = app(recorder.clone())
            .oneshot(
                axum::http::Request::builder()
                    .uri(uri)
                    .header("user-agent", "probe/1.0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let record = recorder.records.lock().unwrap().last().cloned().unwrap();
        (response.status(), record)
    }

    #[test]
    fn test_status_capture_defaults_to_ok() {
        let capture = StatusCapture::new();
        assert_eq!(capture.status(), StatusCode::OK);
    }

    #[test]
    fn test_status_capture_keeps_last_status() {
        let mut capture = StatusCapture::new();
        capture.record(StatusCode::CREATED);
        capture.record(StatusCode::BAD_REQUEST);
        assert_eq!(capture.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_severity_from_status() {
        assert_eq!(Severity::from_status(StatusCode::OK), Severity::Info);
        assert_eq!(Severity::from_status(StatusCode::MOVED_PERMANENTLY), Severity::Info);
        assert_eq!(Severity::from_status(StatusCode::BAD_REQUEST), Severity::Warn);
        assert_eq!(Severity::from_status(StatusCode::NOT_FOUND), Severity::Warn);
        assert_eq!(Severity::from_status(StatusCode::INTERNAL_SERVER_ERROR), Severity::Error);
        assert_eq!(Severity::from_status(StatusCode::BAD_GATEWAY), Severity::Error);
    }

    #[tokio::test]
    async fn test_unset_status_logged_as_ok() {
        let recorder = Arc::new(Recorder::default());
        let (status, record) = call(&recorder, "/implicit").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(record.status, StatusCode::OK);
        assert_eq!(record.severity, Severity::Info);
        assert_eq!(record.method, Method::GET);
        assert_eq!(record.path, "/implicit");
        assert_eq!(record.user_agent.as_deref(), Some("probe/1.0"));
        assert!(record.remote_addr.is_none());
    }

    #[tokio::test]
    async fn test_written_status_is_captured() {
        let recorder = Arc::new(Recorder::default());

        let (status, record) = call(&recorder, "/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(record.status, StatusCode::NOT_FOUND);
        assert_eq!(record.severity, Severity::Warn);

        let (status, record) = call(&recorder, "/broken").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(record.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(record.severity, Severity::Error);

        assert_eq!(recorder.records.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_note_reaches_record_and_response_untouched() {
        let recorder = Arc::new(Recorder::default());
        let response = app(recorder.clone())
            .oneshot(axum::http::Request::builder().uri("/teapot").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"short and stout");

        let record = recorder.records.lock().unwrap().last().cloned().unwrap();
        assert_eq!(record.item_id.as_deref(), Some("7"));
        assert_eq!(record.error.as_deref(), Some("no coffee"));
    }

    #[tokio::test]
    async fn test_tracing_sink_accepts_all_severities() {
        let sink = TracingAccessLog;
        for status in [StatusCode::OK, StatusCode::NOT_FOUND, StatusCode::INTERNAL_SERVER_ERROR] {
            sink.record(&AccessRecord {
                severity: Severity::from_status(status),
                method: Method::GET,
                path: "/health".into(),
                status,
                duration: Duration::from_millis(3),
                message: "HTTP request",
                request_id: None,
                remote_addr: Some("127.0.0.1:4000".parse().unwrap()),
                user_agent: None,
                item_id: None,
                error: None,
            });
        }
    }
}

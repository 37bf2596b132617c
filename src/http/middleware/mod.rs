//! Request middleware.

pub mod access_log;

pub use access_log::{
    access_log_middleware, AccessLog, AccessLogState, AccessRecord, Severity, StatusCapture,
    TracingAccessLog,
};

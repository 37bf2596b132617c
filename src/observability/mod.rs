//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! access_log middleware, handlers:
//!     → logging.rs (subscriber setup for structured log events)
//!     → metrics.rs (request counters, latency histogram, fault counter)
//!     → tracing.rs (per-request span and its outcome fields)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Observers only: nothing here can change a response
//! - Request ID flows into both the access record and the span
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
pub mod tracing;

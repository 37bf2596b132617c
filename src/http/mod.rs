//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, timeout)
//!     → middleware/access_log.rs (span, status capture, access record)
//!     → handlers.rs (health / list / lookup)
//!     → response.rs (JSON body or plain-text fallback)
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;

pub use response::{write_error, write_json, RequestNote, ResponseError};
pub use server::{bind_listener, AppState, MenuServer, ServerError};

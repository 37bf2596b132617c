//! Mock restaurant menu service.
//!
//! Serves a fixed in-memory menu over HTTP, with access logging, request
//! spans and a 10% injected failure rate on the list endpoint for exercising
//! observability tooling.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod menu;
pub mod observability;

pub use config::ServiceConfig;
pub use http::MenuServer;
pub use lifecycle::Shutdown;
pub use menu::{MenuCatalog, MenuItem, MenuService};

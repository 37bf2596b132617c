//! Menu domain.
//!
//! # Data Flow
//! ```text
//! MenuCatalog::seeded()      (fixed items, built once)
//!     → MenuService          (catalog + fault injector, shared via Arc)
//!     → http::handlers       (list / lookup per request)
//! ```
//!
//! # Design Decisions
//! - The catalog is never mutated after construction, so handlers read it
//!   concurrently without locks
//! - Fault injection draws from an injected `RandomSource` so the failure
//!   path can be driven deterministically

pub mod catalog;
pub mod faults;
pub mod item;
pub mod service;

pub use catalog::MenuCatalog;
pub use faults::{FaultInjector, RandomSource, SeededRandom, ThreadRandom, FAILURE_RATE};
pub use item::MenuItem;
pub use service::{LookupError, MenuService, UpstreamFailure};

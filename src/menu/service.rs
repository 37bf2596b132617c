//! Menu service: catalog access with fault injection.

use thiserror::Error;

use crate::menu::catalog::MenuCatalog;
use crate::menu::faults::FaultInjector;
use crate::menu::item::MenuItem;

/// Simulated failure of the restaurant database behind the list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("database connection failed")]
pub struct UpstreamFailure;

/// Reasons a single-item lookup fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("menu item id is empty")]
    MissingId,

    #[error("menu item not found: {0}")]
    NotFound(String),
}

/// Owns the catalog and the fault injector for one server instance.
#[derive(Debug, Default)]
pub struct MenuService {
    catalog: MenuCatalog,
    faults: FaultInjector,
}

impl MenuService {
    pub fn new(catalog: MenuCatalog, faults: FaultInjector) -> Self {
        Self { catalog, faults }
    }

    pub fn catalog(&self) -> &MenuCatalog {
        &self.catalog
    }

    /// All items, unless the fault injector fires first.
    pub fn list(&self) -> Result<Vec<&MenuItem>, UpstreamFailure> {
        if self.faults.should_fail() {
            return Err(UpstreamFailure);
        }
        Ok(self.catalog.items().collect())
    }

    /// Look up one item. The id is trimmed before use.
    pub fn get(&self, raw_id: &str) -> Result<&MenuItem, LookupError> {
        let id = raw_id.trim();
        if id.is_empty() {
            return Err(LookupError::MissingId);
        }
        self.catalog
            .get(id)
            .ok_or_else(|| LookupError::NotFound(id.to_string()))
    }
}

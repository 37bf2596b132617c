//! Menu item record.

use serde::{Deserialize, Serialize};

/// A single food offering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Catalog key.
    pub id: String,
    pub name: String,
    pub price: f64,
    pub available: bool,
    pub description: String,
    pub restaurant: String,
    pub category: String,
    /// Minutes from order to ready.
    pub prep_time_minutes: u32,
}

impl MenuItem {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: &str,
        name: &str,
        price: f64,
        available: bool,
        description: &str,
        restaurant: &str,
        category: &str,
        prep_time_minutes: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            price,
            available,
            description: description.to_string(),
            restaurant: restaurant.to_string(),
            category: category.to_string(),
            prep_time_minutes,
        }
    }
}

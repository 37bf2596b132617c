//! Read-only menu catalog.

use std::collections::BTreeMap;

use crate::menu::item::MenuItem;

/// Immutable mapping from item id to item.
///
/// Built once and only read afterwards. Keys always equal the `id` of the
/// item they map to, because the map is derived from the items themselves.
#[derive(Debug, Clone)]
pub struct MenuCatalog {
    items: BTreeMap<String, MenuItem>,
}

impl MenuCatalog {
    /// Build a catalog from items, keyed by their ids.
    ///
    /// A later item with a duplicate id replaces the earlier one.
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = MenuItem>,
    {
        Self {
            items: items
                .into_iter()
                .map(|item| (item.id.clone(), item))
                .collect(),
        }
    }

    /// The fixed five-item restaurant menu.
    pub fn seeded() -> Self {
        Self::from_items([
            MenuItem::new(
                "1",
                "Margherita Pizza",
                12.99,
                true,
                "Fresh mozzarella, tomato sauce, basil",
                "Tony's Pizza",
                "Pizza",
                20,
            ),
            MenuItem::new(
                "2",
                "Chicken Pad Thai",
                14.99,
                true,
                "Rice noodles, chicken, peanuts, lime",
                "Thai Palace",
                "Asian",
                15,
            ),
            MenuItem::new(
                "3",
                "Classic Burger",
                11.99,
                false,
                "Beef patty, lettuce, tomato, cheese",
                "Burger Joint",
                "Burgers",
                12,
            ),
            MenuItem::new(
                "4",
                "Caesar Salad",
                8.99,
                true,
                "Romaine lettuce, parmesan, croutons",
                "Healthy Bites",
                "Salads",
                5,
            ),
            MenuItem::new(
                "5",
                "Sushi Platter",
                24.99,
                true,
                "12 piece mixed sushi selection",
                "Sakura Sushi",
                "Japanese",
                25,
            ),
        ])
    }

    /// Look up an item by id.
    pub fn get(&self, id: &str) -> Option<&MenuItem> {
        self.items.get(id)
    }

    /// All items, ordered by id.
    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for MenuCatalog {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_catalog() {
        let catalog = MenuCatalog::seeded();
        assert_eq!(catalog.len(), 5);

        for id in ["1", "2", "3", "4", "5"] {
            assert!(catalog.get(id).is_some(), "expected item {id}");
        }

        let pizza = catalog.get("1").unwrap();
        assert_eq!(pizza.name, "Margherita Pizza");
        assert_eq!(pizza.price, 12.99);
        assert!(pizza.available);
        assert_eq!(pizza.prep_time_minutes, 20);
    }

    #[test]
    fn test_keys_match_ids() {
        let catalog = MenuCatalog::seeded();
        for (key, item) in &catalog.items {
            assert_eq!(key, &item.id);
        }
    }

    #[test]
    fn test_seed_values_are_sane() {
        let catalog = MenuCatalog::seeded();
        assert!(catalog.items().all(|item| item.price >= 0.0));
        assert!(!catalog.get("3").unwrap().available);
        assert_eq!(catalog.get("5").unwrap().restaurant, "Sakura Sushi");
    }

    #[test]
    fn test_unknown_id() {
        let catalog = MenuCatalog::seeded();
        assert!(catalog.get("999").is_none());
        assert!(catalog.get("").is_none());
    }

    #[test]
    fn test_duplicate_ids_collapse() {
        let a = MenuItem::new("7", "A", 1.0, true, "", "", "", 1);
        let b = MenuItem::new("7", "B", 2.0, true, "", "", "", 1);
        let catalog = MenuCatalog::from_items([a, b]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("7").unwrap().name, "B");
    }
}

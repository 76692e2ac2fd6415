//! Catalog lookup service
//!
//! Resolves product and addon references to current prices and names.
//! Catalog management itself lives elsewhere; the order core only reads.

use dashmap::DashMap;
use shared::models::{CatalogAddon, CatalogItem, KitchenStation};
use std::path::Path;

/// Read-side catalog interface consumed by order submission and the
/// table query's price fallback.
pub trait Catalog: Send + Sync {
    /// Resolve a product id to its current catalog entry
    fn item(&self, product_id: i64) -> Option<CatalogItem>;

    /// Current price for a product, if it exists and is active
    fn current_price(&self, product_id: i64) -> Option<f64> {
        self.item(product_id)
            .filter(|i| i.is_active)
            .map(|i| i.price)
    }
}

/// In-memory catalog backed by a concurrent map.
///
/// Seeded at startup (from a JSON file or the built-in menu) and safe to
/// update live while requests read it.
pub struct InMemoryCatalog {
    items: DashMap<i64, CatalogItem>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }

    pub fn from_items(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        let catalog = Self::new();
        for item in items {
            catalog.upsert(item);
        }
        catalog
    }

    /// Load a catalog from a JSON file (an array of catalog items)
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let items: Vec<CatalogItem> = serde_json::from_str(&raw)?;
        tracing::info!(count = items.len(), "Catalog loaded from file");
        Ok(Self::from_items(items))
    }

    /// Small built-in menu used when no catalog file is configured
    pub fn default_menu() -> Self {
        let mut burger = CatalogItem::new(101, "House Burger", 10.0, KitchenStation::Food);
        burger.addons.push(CatalogAddon {
            id: 11,
            name: "Extra cheese".to_string(),
            price: 0.5,
        });
        let mut pasta = CatalogItem::new(102, "Carbonara", 9.5, KitchenStation::Food);
        pasta.addons.push(CatalogAddon {
            id: 12,
            name: "Double bacon".to_string(),
            price: 1.0,
        });

        Self::from_items([
            burger,
            pasta,
            CatalogItem::new(103, "Margherita", 8.0, KitchenStation::Food),
            CatalogItem::new(201, "Iced Tea", 3.0, KitchenStation::Beverage),
            CatalogItem::new(202, "Espresso", 2.5, KitchenStation::Beverage),
            CatalogItem::new(203, "House Red (glass)", 4.5, KitchenStation::Beverage),
        ])
    }

    pub fn upsert(&self, item: CatalogItem) {
        self.items.insert(item.id, item);
    }

    pub fn remove(&self, product_id: i64) {
        self.items.remove(&product_id);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog for InMemoryCatalog {
    fn item(&self, product_id: i64) -> Option<CatalogItem> {
        self.items.get(&product_id).map(|entry| entry.clone())
    }
}

/// Find an addon on a catalog item
pub fn find_addon(item: &CatalogItem, addon_id: i64) -> Option<&CatalogAddon> {
    item.addons.iter().find(|a| a.id == addon_id)
}

//! Catalog Model
//!
//! Menu items as the kitchen and pricing layers see them. Each item is
//! routed to exactly one preparation station.

use serde::{Deserialize, Serialize};

/// Preparation station an item is routed to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KitchenStation {
    Food,
    Beverage,
}

impl KitchenStation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Beverage => "beverage",
        }
    }
}

/// Optional extra attached to a catalog item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogAddon {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

/// One sellable menu item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    pub name: String,
    /// Current list price; lines snapshot their own price at submission
    pub price: f64,
    pub station: KitchenStation,
    #[serde(default)]
    pub addons: Vec<CatalogAddon>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl CatalogItem {
    pub fn new(id: i64, name: impl Into<String>, price: f64, station: KitchenStation) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            station,
            addons: Vec::new(),
            is_active: true,
        }
    }
}

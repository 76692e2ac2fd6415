//! Child order - one order placed at a table before consolidation
//!
//! A child order moves Processing → Pending as its kitchen stations
//! report ready, then either joins the table's consolidated bill at
//! closure or (pickup orders) completes on its own.

use super::types::ItemSnapshot;
use crate::models::KitchenStation;
use serde::{Deserialize, Serialize};

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Kitchen is working on it
    #[default]
    Processing,
    /// Fully prepared, eligible for closure or completion
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Open orders count toward a table's active set
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Processing | Self::Pending)
    }
}

/// Kitchen classification of an order's items
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KitchenType {
    Food,
    Beverage,
    /// Both stations have items; both must report ready
    Mixed,
}

impl KitchenType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Beverage => "beverage",
            Self::Mixed => "mixed",
        }
    }

    /// Whether a station participates in preparing this order
    pub fn involves(&self, station: KitchenStation) -> bool {
        match self {
            Self::Food => station == KitchenStation::Food,
            Self::Beverage => station == KitchenStation::Beverage,
            Self::Mixed => true,
        }
    }
}

/// Per-kitchen completion state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Readiness {
    /// Single-station order: one flag
    Single { ready: bool },
    /// Mixed order: both stations tracked independently
    Mixed { food_ready: bool, beverage_ready: bool },
}

impl Readiness {
    /// Initial readiness for a freshly classified order
    pub fn for_kitchen_type(kitchen_type: KitchenType) -> Self {
        match kitchen_type {
            KitchenType::Food | KitchenType::Beverage => Self::Single { ready: false },
            KitchenType::Mixed => Self::Mixed {
                food_ready: false,
                beverage_ready: false,
            },
        }
    }

    /// Every participating station has reported ready
    pub fn is_complete(&self) -> bool {
        match self {
            Self::Single { ready } => *ready,
            Self::Mixed {
                food_ready,
                beverage_ready,
            } => *food_ready && *beverage_ready,
        }
    }

    /// Record a station's completion. For a single-station order the
    /// caller has already validated the station matches.
    pub fn mark(&mut self, station: KitchenStation) {
        match self {
            Self::Single { ready } => *ready = true,
            Self::Mixed {
                food_ready,
                beverage_ready,
            } => match station {
                KitchenStation::Food => *food_ready = true,
                KitchenStation::Beverage => *beverage_ready = true,
            },
        }
    }

    /// Force every flag true (override during table closure)
    pub fn force_complete(&mut self) {
        match self {
            Self::Single { ready } => *ready = true,
            Self::Mixed {
                food_ready,
                beverage_ready,
            } => {
                *food_ready = true;
                *beverage_ready = true;
            }
        }
    }
}

/// One order placed during a table visit (or a pickup order when
/// `table_number` is absent)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChildOrder {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub status: OrderStatus,
    pub kitchen_type: KitchenType,
    pub readiness: Readiness,
    pub items: Vec<ItemSnapshot>,
    /// Pre-tax subtotal; consolidation always merges from this value
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    /// Tax postponed to consolidation (table orders)
    pub tax_deferred: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    /// Receipt reference, set on individual completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_number: Option<String>,
    /// System notes (forced readiness, payment confirmation)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ChildOrder {
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    pub fn is_table_order(&self) -> bool {
        self.table_number.is_some()
    }

    /// Stations that have not reported ready yet
    pub fn pending_kitchens(&self) -> Vec<KitchenStation> {
        match (self.kitchen_type, self.readiness) {
            (KitchenType::Food, Readiness::Single { ready }) if !ready => {
                vec![KitchenStation::Food]
            }
            (KitchenType::Beverage, Readiness::Single { ready }) if !ready => {
                vec![KitchenStation::Beverage]
            }
            (
                KitchenType::Mixed,
                Readiness::Mixed {
                    food_ready,
                    beverage_ready,
                },
            ) => {
                let mut pending = Vec::new();
                if !food_ready {
                    pending.push(KitchenStation::Food);
                }
                if !beverage_ready {
                    pending.push(KitchenStation::Beverage);
                }
                pending
            }
            _ => Vec::new(),
        }
    }

    pub fn push_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }
}

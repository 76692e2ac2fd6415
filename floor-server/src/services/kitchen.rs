//! Kitchen classification service
//!
//! Derives an order's kitchen type from where its items are prepared and
//! reports readiness for display and closure error details.

use serde::Serialize;
use shared::models::KitchenStation;
use shared::order::types::ItemSnapshot;
use shared::order::{ChildOrder, KitchenType};

/// Per-order readiness summary
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessReport {
    pub kitchen_type: KitchenType,
    /// Every participating station has reported ready
    pub complete: bool,
    /// Stations still working
    pub pending_kitchens: Vec<KitchenStation>,
}

#[derive(Debug, Clone, Default)]
pub struct KitchenClassifier;

impl KitchenClassifier {
    pub fn new() -> Self {
        Self
    }

    /// kitchen_type = mixed iff the items span both stations.
    ///
    /// An empty item list cannot occur on a persisted order (submission
    /// rejects it); food-only is the defensive fallback.
    pub fn classify(&self, items: &[ItemSnapshot]) -> KitchenType {
        let has_food = items.iter().any(|i| i.station == KitchenStation::Food);
        let has_beverage = items.iter().any(|i| i.station == KitchenStation::Beverage);
        match (has_food, has_beverage) {
            (true, true) => KitchenType::Mixed,
            (false, true) => KitchenType::Beverage,
            _ => KitchenType::Food,
        }
    }

    pub fn readiness_report(&self, order: &ChildOrder) -> ReadinessReport {
        ReadinessReport {
            kitchen_type: order.kitchen_type,
            complete: order.readiness.is_complete(),
            pending_kitchens: order.pending_kitchens(),
        }
    }

    /// Whether a station's mark-ready call is meaningful for this order
    pub fn station_applies(&self, kitchen_type: KitchenType, station: KitchenStation) -> bool {
        kitchen_type.involves(station)
    }
}

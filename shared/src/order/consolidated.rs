//! Consolidated order - the single merged, tax-final bill of a table visit
//!
//! Created exactly once at table closure and never mutated afterward;
//! this is the durable receipt.

use super::child::OrderStatus;
use super::types::ItemSnapshot;
use crate::models::KitchenStation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsolidatedOrder {
    pub id: String,
    pub table_number: String,
    /// Exactly the child orders merged by this closure
    pub child_order_ids: Vec<String>,
    /// Every child's items, carried over with pre-tax line totals
    pub items: Vec<ItemSnapshot>,
    /// Σ child pre-tax subtotals
    pub subtotal: f64,
    /// Tax realized once, over the merged subtotal
    pub tax: f64,
    pub total: f64,
    pub payment_method: String,
    /// Always Completed; present for uniform display handling
    pub status: OrderStatus,
    pub receipt_number: String,
    pub closed_at: i64,
}

/// Per-order detail for a blocked closure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlockedOrder {
    pub order_id: String,
    /// Stations that have not reported ready
    pub pending_kitchens: Vec<KitchenStation>,
}

/// Successful closure payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseTableReceipt {
    pub order: ConsolidatedOrder,
    /// True when an idempotent retry returned the stored receipt
    /// instead of running consolidation again
    #[serde(default)]
    pub replay: bool,
}

/// Outcome of a close-table request. NeedsConfirmation is not a
/// failure: the caller is expected to re-invoke with `force` after a
/// human confirms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CloseTableOutcome {
    Closed(CloseTableReceipt),
    NeedsConfirmation {
        /// Non-mixed orders still Processing
        order_ids: Vec<String>,
    },
}

//! Table query - read-only view of a table's active orders
//!
//! Reconstructs each item's base price for customer display. Completed
//! and cancelled orders are excluded so a new occupant scanning the
//! same table's code never sees a previous diner's finished receipt.

use crate::orders::money::{self, to_decimal, to_f64};
use crate::services::{Catalog, KitchenClassifier, ReadinessReport};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::order::types::{AddonSnapshot, ItemSnapshot};
use shared::order::{ChildOrder, OrderStatus};

/// Where a displayed base price came from
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceSource {
    /// Stored price snapshot from submission time
    Snapshot,
    /// Current catalog price (legacy row without a snapshot)
    Catalog,
    /// Back-computed as (line total − addon total) / quantity
    Derived,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    pub product_id: i64,
    pub name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub price_source: PriceSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub addons: Vec<AddonSnapshot>,
    pub line_total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub id: String,
    pub status: OrderStatus,
    pub readiness: ReadinessReport,
    pub items: Vec<ItemView>,
    pub subtotal: f64,
    pub total: f64,
    pub tax_deferred: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableOrdersView {
    pub table_number: String,
    pub orders: Vec<OrderView>,
    /// Σ open order totals (pre-tax for deferred orders)
    pub running_total: f64,
}

/// Three-tier base-price fallback: snapshot → catalog → derived
fn resolve_unit_price(item: &ItemSnapshot, catalog: &dyn Catalog) -> (f64, PriceSource) {
    if let Some(price) = item.unit_price {
        return (price, PriceSource::Snapshot);
    }
    if let Some(price) = catalog.current_price(item.product_id) {
        tracing::warn!(
            product_id = item.product_id,
            "Item has no price snapshot; using current catalog price"
        );
        return (price, PriceSource::Catalog);
    }
    tracing::warn!(
        product_id = item.product_id,
        "Item has no snapshot or catalog entry; deriving price from line total"
    );
    let per_unit = if item.quantity > 0 {
        to_f64(to_decimal(item.line_total) / Decimal::from(item.quantity))
    } else {
        0.0
    };
    (
        money::add(per_unit, -item.addon_total_per_unit()),
        PriceSource::Derived,
    )
}

fn item_view(item: &ItemSnapshot, catalog: &dyn Catalog) -> ItemView {
    let (unit_price, price_source) = resolve_unit_price(item, catalog);
    ItemView {
        product_id: item.product_id,
        name: item.name.clone(),
        quantity: item.quantity,
        unit_price,
        price_source,
        note: item.note.clone(),
        addons: item.addons.clone(),
        line_total: item.line_total,
    }
}

/// Build the display view from the table's stored child orders
pub fn build_table_view(
    table_number: &str,
    orders: &[ChildOrder],
    catalog: &dyn Catalog,
    classifier: &KitchenClassifier,
) -> TableOrdersView {
    let mut views = Vec::new();
    let mut running_total = Decimal::ZERO;
    for order in orders.iter().filter(|o| o.is_open()) {
        running_total += to_decimal(order.total);
        views.push(OrderView {
            id: order.id.clone(),
            status: order.status,
            readiness: classifier.readiness_report(order),
            items: order.items.iter().map(|i| item_view(i, catalog)).collect(),
            subtotal: order.subtotal,
            total: order.total,
            tax_deferred: order.tax_deferred,
            created_at: order.created_at,
        });
    }
    TableOrdersView {
        table_number: table_number.to_string(),
        orders: views,
        running_total: to_f64(running_total),
    }
}

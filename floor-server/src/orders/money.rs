//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary arithmetic is done in `Decimal` and converted to `f64`
//! only at the storage/serialization boundary, rounded half-up to two
//! decimal places.

use crate::orders::traits::OrderError;
use rust_decimal::prelude::*;
use shared::order::types::{AddonSnapshot, CommandErrorCode, ItemInput, ItemSnapshot};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per unit
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i32 = 9999;
/// Maximum allowed quantity per addon selection
pub const MAX_ADDON_QUANTITY: i32 = 99;

pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Round to 2 decimal places and convert back to f64
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
pub fn require_finite(value: f64, field_name: &str) -> Result<(), OrderError> {
    if !value.is_finite() {
        return Err(OrderError::InvalidOperation(
            CommandErrorCode::InvalidAmount,
            format!("{} must be a finite number, got {}", field_name, value),
        ));
    }
    Ok(())
}

/// Validate an item input before price resolution
pub fn validate_item_input(item: &ItemInput) -> Result<(), OrderError> {
    if item.quantity <= 0 {
        return Err(OrderError::InvalidOperation(
            CommandErrorCode::InvalidQuantity,
            format!("quantity must be positive, got {}", item.quantity),
        ));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(OrderError::InvalidOperation(
            CommandErrorCode::InvalidQuantity,
            format!(
                "quantity exceeds maximum allowed ({}), got {}",
                MAX_QUANTITY, item.quantity
            ),
        ));
    }
    for addon in &item.addons {
        if addon.quantity <= 0 || addon.quantity > MAX_ADDON_QUANTITY {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::InvalidQuantity,
                format!(
                    "addon quantity must be in 1..={}, got {}",
                    MAX_ADDON_QUANTITY, addon.quantity
                ),
            ));
        }
    }
    Ok(())
}

/// Validate a catalog-resolved unit price before snapshotting it
pub fn validate_price(price: f64, field_name: &str) -> Result<(), OrderError> {
    require_finite(price, field_name)?;
    if price < 0.0 {
        return Err(OrderError::InvalidOperation(
            CommandErrorCode::InvalidAmount,
            format!("{} must be non-negative, got {}", field_name, price),
        ));
    }
    if price > MAX_PRICE {
        return Err(OrderError::InvalidOperation(
            CommandErrorCode::InvalidAmount,
            format!(
                "{} exceeds maximum allowed ({}), got {}",
                field_name, MAX_PRICE, price
            ),
        ));
    }
    Ok(())
}

/// line_total = (unit_price + Σ addon.price × addon.quantity) × quantity
pub fn line_total(unit_price: f64, addons: &[AddonSnapshot], quantity: i32) -> f64 {
    let addon_total: Decimal = addons
        .iter()
        .map(|a| to_decimal(a.price) * Decimal::from(a.quantity))
        .sum();
    let per_unit = to_decimal(unit_price) + addon_total;
    to_f64(per_unit * Decimal::from(quantity))
}

/// Pre-tax subtotal of an item list (line totals are already rounded)
pub fn items_subtotal(items: &[ItemSnapshot]) -> f64 {
    let sum: Decimal = items.iter().map(|i| to_decimal(i.line_total)).sum();
    to_f64(sum)
}

/// Sum of two rounded amounts (subtotal + tax)
pub fn add(a: f64, b: f64) -> f64 {
    to_f64(to_decimal(a) + to_decimal(b))
}

//! Shared types for order command processing

use super::child::ChildOrder;
use crate::models::KitchenStation;
use serde::{Deserialize, Serialize};

// ============================================================================
// Item Types
// ============================================================================

/// Addon snapshot - price frozen at submission time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddonSnapshot {
    pub addon_id: i64,
    pub name: String,
    /// Addon price at submission
    pub price: f64,
    pub quantity: i32,
}

/// Item snapshot - complete line as stored on a child order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemSnapshot {
    /// Product ID
    pub product_id: i64,
    /// Product name snapshot
    pub name: String,
    /// Quantity ordered
    pub quantity: i32,
    /// Base unit price at submission time. Absent on legacy rows; the
    /// query path falls back to catalog price, then back-calculation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    /// Station this line is routed to
    pub station: KitchenStation,
    /// Diner note ("no onions")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Selected addons with price snapshots
    #[serde(default)]
    pub addons: Vec<AddonSnapshot>,
    /// (unit_price + addon total per unit) x quantity, rounded
    pub line_total: f64,
}

impl ItemSnapshot {
    /// Total addon cost per single unit of this line
    pub fn addon_total_per_unit(&self) -> f64 {
        self.addons
            .iter()
            .map(|a| a.price * a.quantity as f64)
            .sum()
    }
}

/// Item input - structured submission shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemInput {
    pub product_id: i64,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub addons: Vec<AddonSelection>,
}

/// Addon selection within an item input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddonSelection {
    pub addon_id: i64,
    #[serde(default = "default_addon_quantity")]
    pub quantity: i32,
}

fn default_addon_quantity() -> i32 {
    1
}

/// Cart line - compact submission shape; each addon id implies quantity 1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Product ID
    pub product: i64,
    pub qty: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub addon_ids: Vec<i64>,
}

impl From<CartLine> for ItemInput {
    fn from(line: CartLine) -> Self {
        Self {
            product_id: line.product,
            quantity: line.qty,
            note: line.note,
            addons: line
                .addon_ids
                .into_iter()
                .map(|addon_id| AddonSelection {
                    addon_id,
                    quantity: 1,
                })
                .collect(),
        }
    }
}

/// Normalize the two accepted submission shapes to one canonical list.
/// `items` wins when both are present.
pub fn normalize_lines(
    items: Option<Vec<ItemInput>>,
    cart: Option<Vec<CartLine>>,
) -> Vec<ItemInput> {
    match (items, cart) {
        (Some(items), _) if !items.is_empty() => items,
        (_, Some(cart)) => cart.into_iter().map(ItemInput::from).collect(),
        (Some(items), None) => items,
        (None, None) => Vec::new(),
    }
}

// ============================================================================
// Command Response
// ============================================================================

/// Command response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    /// The command ID this responds to
    pub command_id: String,
    /// Whether the command succeeded
    pub success: bool,
    /// Order affected by the command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Order state after the command, for display refresh
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<ChildOrder>,
    /// Error details if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CommandError>,
}

impl CommandResponse {
    pub fn success(command_id: String, order_id: Option<String>) -> Self {
        Self {
            command_id,
            success: true,
            order_id,
            order: None,
            error: None,
        }
    }

    /// Success carrying the updated order state
    pub fn applied(command_id: String, order: ChildOrder) -> Self {
        Self {
            command_id,
            success: true,
            order_id: Some(order.id.clone()),
            order: Some(order),
            error: None,
        }
    }

    pub fn error(command_id: String, error: CommandError) -> Self {
        Self {
            command_id,
            success: false,
            order_id: None,
            order: None,
            error: Some(error),
        }
    }

    /// A replayed command: acknowledged without re-execution
    pub fn duplicate(command_id: String) -> Self {
        Self {
            command_id,
            success: true,
            order_id: None,
            order: None,
            error: None,
        }
    }
}

/// Command error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandError {
    pub code: CommandErrorCode,
    pub message: String,
}

impl CommandError {
    pub fn new(code: CommandErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Command error codes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandErrorCode {
    OrderNotFound,
    OrderAlreadyCompleted,
    OrderAlreadyCancelled,
    ItemNotFound,
    TableNotFound,
    TableUnavailable,
    EmptyOrder,
    InvalidQuantity,
    InvalidAmount,
    InvalidKitchen,
    InvalidOperation,
    DuplicateCommand,
    NoOpenOrders,
    ClosureBlocked,
    ConfirmationRequired,
    InconsistentState,
    InternalError,
    // Storage errors (maps to ErrorCode 94xx)
    StorageFull,
    OutOfMemory,
    StorageCorrupted,
    SystemBusy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_line_conversion() {
        let line = CartLine {
            product: 42,
            qty: 2,
            note: Some("extra hot".to_string()),
            addon_ids: vec![7, 9],
        };
        let input: ItemInput = line.into();
        assert_eq!(input.product_id, 42);
        assert_eq!(input.quantity, 2);
        assert_eq!(input.addons.len(), 2);
        assert!(input.addons.iter().all(|a| a.quantity == 1));
    }

    #[test]
    fn test_normalize_prefers_items() {
        let items = vec![ItemInput {
            product_id: 1,
            quantity: 1,
            note: None,
            addons: vec![],
        }];
        let cart = vec![CartLine {
            product: 2,
            qty: 3,
            note: None,
            addon_ids: vec![],
        }];
        let lines = normalize_lines(Some(items), Some(cart));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product_id, 1);
    }

    #[test]
    fn test_normalize_falls_back_to_cart() {
        let cart = vec![CartLine {
            product: 2,
            qty: 3,
            note: None,
            addon_ids: vec![5],
        }];
        let lines = normalize_lines(None, Some(cart));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product_id, 2);
        assert_eq!(lines[0].addons[0].addon_id, 5);
    }

    #[test]
    fn test_duplicate_response_is_success_without_order() {
        let resp = CommandResponse::duplicate("cmd-1".to_string());
        assert!(resp.success);
        assert!(resp.order_id.is_none());
        assert!(resp.error.is_none());
    }

    #[test]
    fn test_error_code_serde() {
        let json = serde_json::to_string(&CommandErrorCode::ClosureBlocked).unwrap();
        assert_eq!(json, "\"CLOSURE_BLOCKED\"");
        let back: CommandErrorCode = serde_json::from_str("\"SYSTEM_BUSY\"").unwrap();
        assert_eq!(back, CommandErrorCode::SystemBusy);
    }
}

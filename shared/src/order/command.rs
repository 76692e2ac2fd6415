//! Order commands - requests from clients to mutate order state
//!
//! Every mutation carries a `command_id` so a retried request is
//! acknowledged instead of applied twice.

use super::types::{CartLine, ItemInput};
use crate::models::KitchenStation;
use serde::{Deserialize, Serialize};

/// Command envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCommand {
    /// Client-generated unique ID (idempotency key)
    pub command_id: String,
    /// Operator who issued the command
    pub operator_id: String,
    /// Operator name (snapshot for audit)
    pub operator_name: String,
    /// Client timestamp (Unix milliseconds)
    pub timestamp: i64,
    pub payload: OrderCommandPayload,
}

impl OrderCommand {
    pub fn new(
        payload: OrderCommandPayload,
        operator_id: impl Into<String>,
        operator_name: impl Into<String>,
    ) -> Self {
        Self {
            command_id: uuid::Uuid::new_v4().to_string(),
            operator_id: operator_id.into(),
            operator_name: operator_name.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            payload,
        }
    }

    /// Same command with an explicit idempotency key
    pub fn with_command_id(mut self, command_id: impl Into<String>) -> Self {
        self.command_id = command_id.into();
        self
    }
}

/// Command payload variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderCommandPayload {
    /// Place a new order. `table_number` absent means pickup.
    /// Items arrive in one of two shapes; `items` wins if both appear.
    SubmitOrder {
        #[serde(skip_serializing_if = "Option::is_none")]
        table_number: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        items: Option<Vec<ItemInput>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        cart: Option<Vec<CartLine>>,
    },

    /// A station reports its part of an order prepared
    MarkReady {
        order_id: String,
        kitchen: KitchenStation,
    },

    /// Record payment received for an order (idempotent)
    ConfirmPayment { order_id: String },

    /// Complete a pickup order with immediate tax
    CompleteOrder {
        order_id: String,
        payment_method: String,
    },

    /// Cancel an open child order
    CancelOrder {
        order_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    /// Consolidate and settle a table's open orders
    CloseTable {
        table_number: String,
        payment_method: String,
        /// Second-call override: force non-mixed Processing orders to
        /// Pending instead of prompting
        #[serde(default)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_serde_tagged() {
        let payload = OrderCommandPayload::CloseTable {
            table_number: "12".to_string(),
            payment_method: "cash".to_string(),
            force: false,
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"type\":\"CLOSE_TABLE\""));

        let back: OrderCommandPayload = serde_json::from_str(&json).unwrap();
        match back {
            OrderCommandPayload::CloseTable { table_number, .. } => {
                assert_eq!(table_number, "12");
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_force_defaults_false() {
        let json = r#"{"type":"CLOSE_TABLE","table_number":"3","payment_method":"card"}"#;
        let payload: OrderCommandPayload = serde_json::from_str(json).unwrap();
        match payload {
            OrderCommandPayload::CloseTable { force, .. } => assert!(!force),
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_command_ids_unique() {
        let a = OrderCommand::new(
            OrderCommandPayload::ConfirmPayment {
                order_id: "ord-1".to_string(),
            },
            "op-1",
            "Ana",
        );
        let b = OrderCommand::new(
            OrderCommandPayload::ConfirmPayment {
                order_id: "ord-1".to_string(),
            },
            "op-1",
            "Ana",
        );
        assert_ne!(a.command_id, b.command_id);
    }
}

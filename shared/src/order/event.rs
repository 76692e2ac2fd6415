//! Order events - immutable facts recorded after command processing
//!
//! Events are emitted after the transaction commits and feed the
//! notification sink; they are not a replay log.

use super::child::KitchenType;
use serde::{Deserialize, Serialize};

/// Order event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    /// Event unique ID
    pub event_id: String,
    /// Order this event belongs to
    pub order_id: String,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
    /// Operator who triggered this event
    pub operator_id: String,
    /// Operator name (snapshot for audit)
    pub operator_name: String,
    /// Command that triggered this event (for audit tracing)
    pub command_id: String,
    /// Event type
    pub event_type: OrderEventType,
    /// Event payload
    pub payload: EventPayload,
}

/// Event type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEventType {
    OrderPlaced,
    OrderReady,
    PaymentConfirmed,
    OrderCompleted,
    OrderCancelled,
    TableClosed,
}

impl std::fmt::Display for OrderEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderEventType::OrderPlaced => write!(f, "ORDER_PLACED"),
            OrderEventType::OrderReady => write!(f, "ORDER_READY"),
            OrderEventType::PaymentConfirmed => write!(f, "PAYMENT_CONFIRMED"),
            OrderEventType::OrderCompleted => write!(f, "ORDER_COMPLETED"),
            OrderEventType::OrderCancelled => write!(f, "ORDER_CANCELLED"),
            OrderEventType::TableClosed => write!(f, "TABLE_CLOSED"),
        }
    }
}

/// Event payload variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    OrderPlaced {
        #[serde(skip_serializing_if = "Option::is_none")]
        table_number: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        session_id: Option<String>,
        total: f64,
    },

    OrderReady {
        #[serde(skip_serializing_if = "Option::is_none")]
        table_number: Option<String>,
        kitchen_type: KitchenType,
        /// Readiness forced complete during closure, not reported by
        /// the station
        #[serde(default)]
        forced: bool,
    },

    PaymentConfirmed {},

    OrderCompleted {
        receipt_number: String,
        total: f64,
        payment_method: String,
    },

    OrderCancelled {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    /// Emitted once per closure; `order_id` on the envelope is the
    /// consolidated order's id
    TableClosed {
        table_number: String,
        child_order_ids: Vec<String>,
        total: f64,
        payment_method: String,
    },
}

impl OrderEvent {
    pub fn new(
        order_id: String,
        operator_id: String,
        operator_name: String,
        command_id: String,
        event_type: OrderEventType,
        payload: EventPayload,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            order_id,
            timestamp: chrono::Utc::now().timestamp_millis(),
            operator_id,
            operator_name,
            command_id,
            event_type,
            payload,
        }
    }
}

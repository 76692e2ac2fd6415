//! Order Domain Module
//!
//! This module provides types for the table-order lifecycle:
//! - Commands: Requests from clients to mutate orders
//! - Events: Immutable facts recorded after command processing
//! - Child orders: Per-submission kitchen state
//! - Consolidated orders: The merged, tax-final bill of a table visit

pub mod child;
pub mod command;
pub mod consolidated;
pub mod event;
pub mod types;

// Re-exports
pub use child::{ChildOrder, KitchenType, OrderStatus, Readiness};
pub use command::{OrderCommand, OrderCommandPayload};
pub use consolidated::{BlockedOrder, CloseTableOutcome, CloseTableReceipt, ConsolidatedOrder};
pub use event::{EventPayload, OrderEvent, OrderEventType};
pub use types::*;

//! Table-Order Coordination Module
//!
//! This module implements the dine-in order lifecycle:
//!
//! - **manager**: OrdersManager - command processing and table closure
//! - **actions**: one handler per command, executed inside a write transaction
//! - **storage**: redb-based persistence for orders, tables, sessions
//! - **audit**: hash-chained closure audit log
//! - **money**: Decimal arithmetic helpers for totals and tax
//!
//! # Data Flow
//!
//! ```text
//! OrderCommand → OrdersManager → Action → Storage (redb)
//!                      ↓
//!                 Notifier (post-commit)
//! ```
//!
//! All state changes for a command happen in a single write transaction;
//! notifications and audit records are emitted only after commit.

pub mod actions;
pub mod audit;
pub mod manager;
pub mod money;
pub mod storage;
pub mod traits;

// Re-exports
pub use audit::{AuditError, ClosureAuditLog, ClosureAuditRecord};
pub use manager::{ManagerConfig, ManagerError, ManagerResult, OrdersManager};
pub use storage::{OrderStorage, StorageError};
pub use traits::{CommandMetadata, OrderError};

// Re-export shared types for convenience
pub use shared::order::{
    ChildOrder, CloseTableOutcome, CloseTableReceipt, ConsolidatedOrder, KitchenType, OrderCommand,
    OrderCommandPayload, OrderEvent, OrderEventType, OrderStatus, Readiness,
};

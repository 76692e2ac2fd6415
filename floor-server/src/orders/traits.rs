//! Core traits and context for order command processing

use super::storage::{OrderStorage, StorageError};
use crate::services::{Catalog, KitchenClassifier, TaxService};
use redb::WriteTransaction;
use shared::models::{DiningSession, DiningTable};
use shared::order::consolidated::CloseTableOutcome;
use shared::order::types::CommandErrorCode;
use shared::order::{BlockedOrder, ChildOrder, ConsolidatedOrder, OrderEvent};
use thiserror::Error;

/// Errors produced while executing an order action
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order already completed: {0}")]
    OrderAlreadyCompleted(String),

    #[error("Order already cancelled: {0}")]
    OrderAlreadyCancelled(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Table unavailable: {0}")]
    TableUnavailable(String),

    #[error("Order has no items")]
    EmptyOrder,

    #[error("No open orders for table {0}")]
    NoOpenOrders(String),

    /// Mixed-kitchen closure precondition unmet; carries per-order detail
    #[error("Closure blocked: {} order(s) not fully prepared", .0.len())]
    ClosureBlocked(Vec<BlockedOrder>),

    /// Defensive post-check failure: the open-order set disagrees with
    /// stored statuses. Indicates a logic bug if ever triggered.
    #[error("Inconsistent order state: {0:?}")]
    InconsistentState(Vec<String>),

    #[error("{1}")]
    InvalidOperation(CommandErrorCode, String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Command metadata passed to every action
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    pub command_id: String,
    pub operator_id: String,
    pub operator_name: String,
    /// Client timestamp (Unix milliseconds)
    pub timestamp: i64,
}

/// What an action produced: the mutated order (child-order commands), or
/// a closure outcome (close_table), plus the events to publish after
/// commit.
#[derive(Debug)]
pub struct ActionOutput {
    pub order: Option<ChildOrder>,
    pub closure: Option<CloseTableOutcome>,
    pub events: Vec<OrderEvent>,
}

impl ActionOutput {
    pub fn order(order: ChildOrder, events: Vec<OrderEvent>) -> Self {
        Self {
            order: Some(order),
            closure: None,
            events,
        }
    }

    pub fn closure(outcome: CloseTableOutcome, events: Vec<OrderEvent>) -> Self {
        Self {
            order: None,
            closure: Some(outcome),
            events,
        }
    }
}

/// Execution context for order actions
///
/// Wraps one redb write transaction together with the injected service
/// handles. redb serializes writers, so every action observes a
/// consistent snapshot and commits atomically: a kitchen device marking
/// readiness and a manager closing the table cannot interleave
/// mid-operation.
pub struct CommandContext<'a> {
    txn: &'a WriteTransaction,
    storage: &'a OrderStorage,
    pub catalog: &'a dyn Catalog,
    pub tax: &'a dyn TaxService,
    pub classifier: &'a KitchenClassifier,
    /// Server timestamp for this command (Unix milliseconds)
    pub now: i64,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        txn: &'a WriteTransaction,
        storage: &'a OrderStorage,
        catalog: &'a dyn Catalog,
        tax: &'a dyn TaxService,
        classifier: &'a KitchenClassifier,
        now: i64,
    ) -> Self {
        Self {
            txn,
            storage,
            catalog,
            tax,
            classifier,
            now,
        }
    }

    // ========== Child orders ==========

    pub fn load_order(&self, order_id: &str) -> Result<ChildOrder, OrderError> {
        self.storage
            .get_order_txn(self.txn, order_id)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
    }

    /// Persist a new order and register it in the table index
    pub fn insert_order(&self, order: &ChildOrder) -> Result<(), OrderError> {
        Ok(self.storage.insert_order(self.txn, order)?)
    }

    /// Persist changes to an existing order (index untouched)
    pub fn update_order(&self, order: &ChildOrder) -> Result<(), OrderError> {
        Ok(self.storage.update_order(self.txn, order)?)
    }

    /// Remove an order and its table index entry
    pub fn delete_order(&self, order: &ChildOrder) -> Result<(), OrderError> {
        Ok(self.storage.delete_order(self.txn, order)?)
    }

    pub fn orders_for_table(&self, table_number: &str) -> Result<Vec<ChildOrder>, OrderError> {
        Ok(self.storage.orders_for_table_txn(self.txn, table_number)?)
    }

    // ========== Consolidated orders ==========

    pub fn insert_consolidated(&self, order: &ConsolidatedOrder) -> Result<(), OrderError> {
        Ok(self.storage.insert_consolidated(self.txn, order)?)
    }

    pub fn get_consolidated(&self, id: &str) -> Result<Option<ConsolidatedOrder>, OrderError> {
        Ok(self.storage.get_consolidated_txn(self.txn, id)?)
    }

    // ========== Tables ==========

    pub fn load_table(&self, table_number: &str) -> Result<DiningTable, OrderError> {
        self.storage
            .get_table_txn(self.txn, table_number)?
            .ok_or_else(|| OrderError::TableNotFound(table_number.to_string()))
    }

    pub fn save_table(&self, table: &DiningTable) -> Result<(), OrderError> {
        Ok(self.storage.put_table(self.txn, table)?)
    }

    // ========== Sessions ==========

    pub fn get_session(&self, table_number: &str) -> Result<Option<DiningSession>, OrderError> {
        Ok(self.storage.get_session_txn(self.txn, table_number)?)
    }

    pub fn save_session(&self, session: &DiningSession) -> Result<(), OrderError> {
        Ok(self.storage.put_session(self.txn, session)?)
    }

    pub fn end_session(&self, table_number: &str) -> Result<(), OrderError> {
        Ok(self.storage.delete_session(self.txn, table_number)?)
    }

    // ========== Closure tokens ==========

    pub fn get_closure_token(
        &self,
        table_number: &str,
    ) -> Result<Option<super::storage::ClosureToken>, OrderError> {
        Ok(self.storage.get_closure_token_txn(self.txn, table_number)?)
    }

    pub fn put_closure_token(
        &self,
        table_number: &str,
        token: &super::storage::ClosureToken,
    ) -> Result<(), OrderError> {
        Ok(self
            .storage
            .put_closure_token(self.txn, table_number, token)?)
    }
}

/// Command action interface: validate against the current snapshot,
/// mutate state through the context, return the output. Nothing is
/// durable until the manager commits the transaction.
pub trait CommandHandler {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<ActionOutput, OrderError>;
}

//! redb-based storage layer for the table-order lifecycle
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `child_orders` | `order_id` | `ChildOrder` | Live child orders |
//! | `table_orders` | `(table_number, order_id)` | `()` | Table index |
//! | `consolidated_orders` | `order_id` | `ConsolidatedOrder` | Closure receipts |
//! | `dining_tables` | `table_number` | `DiningTable` | Floor plan |
//! | `sessions` | `table_number` | `DiningSession` | Live session per table |
//! | `closure_tokens` | `table_number` | `ClosureToken` | Closure idempotency |
//! | `processed_commands` | `command_id` | `()` | Command idempotency |
//! | `counters` | name | `u64` | Receipt counter |
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate` by default: once `commit()`
//! returns, the closure's create + delete + table-free sequence is either
//! fully on disk or not at all. A register losing power mid-closure
//! restarts with the table still open rather than double-billed.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use serde::{Deserialize, Serialize};
use shared::models::{DiningSession, DiningTable, TableStatus};
use shared::order::{ChildOrder, ConsolidatedOrder};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Live child orders: key = order_id, value = JSON ChildOrder
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("child_orders");

/// Table index: key = (table_number, order_id), value = empty
const TABLE_ORDERS_TABLE: TableDefinition<(&str, &str), ()> = TableDefinition::new("table_orders");

/// Closure receipts: key = consolidated order id, value = JSON ConsolidatedOrder
const CONSOLIDATED_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new("consolidated_orders");

/// Floor plan: key = table_number, value = JSON DiningTable
const TABLES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("dining_tables");

/// Live session per table: key = table_number, value = JSON DiningSession
const SESSIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("sessions");

/// Closure idempotency tokens: key = table_number, value = JSON ClosureToken
const CLOSURE_TOKENS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("closure_tokens");

/// Processed command IDs: key = command_id, value = empty (idempotency)
const PROCESSED_COMMANDS_TABLE: TableDefinition<&str, ()> =
    TableDefinition::new("processed_commands");

/// Counters: key = name, value = u64
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

const RECEIPT_COUNT_KEY: &str = "receipt_count";

/// Idempotency record for a committed closure
///
/// Keyed by table number: a second closure call inside the replay window
/// returns the stored receipt instead of NotFound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosureToken {
    pub consolidated_order_id: String,
    pub closed_at: i64,
}

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Order storage backed by redb
#[derive(Clone)]
pub struct OrderStorage {
    db: Arc<Database>,
}

impl OrderStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    fn init_tables(&self) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let _ = txn.open_table(ORDERS_TABLE)?;
            let _ = txn.open_table(TABLE_ORDERS_TABLE)?;
            let _ = txn.open_table(CONSOLIDATED_TABLE)?;
            let _ = txn.open_table(TABLES_TABLE)?;
            let _ = txn.open_table(SESSIONS_TABLE)?;
            let _ = txn.open_table(CLOSURE_TOKENS_TABLE)?;
            let _ = txn.open_table(PROCESSED_COMMANDS_TABLE)?;

            let mut counters = txn.open_table(COUNTERS_TABLE)?;
            if counters.get(RECEIPT_COUNT_KEY)?.is_none() {
                counters.insert(RECEIPT_COUNT_KEY, 0u64)?;
            }
        }
        txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction (redb serializes writers)
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Liveness probe for the health endpoint
    pub fn ping(&self) -> StorageResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(COUNTERS_TABLE)?;
        Ok(())
    }

    // ========== Receipt counter ==========

    /// Increment and return the receipt counter (crash-safe, own transaction).
    ///
    /// Must be called OUTSIDE any other write transaction: redb does not
    /// allow nested writers.
    pub fn next_receipt_count(&self) -> StorageResult<u64> {
        let txn = self.db.begin_write()?;
        let next = {
            let mut table = txn.open_table(COUNTERS_TABLE)?;
            let current = table
                .get(RECEIPT_COUNT_KEY)?
                .map(|g| g.value())
                .unwrap_or(0);
            let next = current + 1;
            table.insert(RECEIPT_COUNT_KEY, next)?;
            next
        };
        txn.commit()?;
        Ok(next)
    }

    // ========== Command idempotency ==========

    pub fn is_command_processed(&self, command_id: &str) -> StorageResult<bool> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        Ok(table.get(command_id)?.is_some())
    }

    pub fn is_command_processed_txn(
        &self,
        txn: &WriteTransaction,
        command_id: &str,
    ) -> StorageResult<bool> {
        let table = txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        Ok(table.get(command_id)?.is_some())
    }

    pub fn mark_command_processed(
        &self,
        txn: &WriteTransaction,
        command_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        table.insert(command_id, ())?;
        Ok(())
    }

    // ========== Child orders ==========

    /// Persist a new order and register it in the table index
    pub fn insert_order(&self, txn: &WriteTransaction, order: &ChildOrder) -> StorageResult<()> {
        {
            let mut table = txn.open_table(ORDERS_TABLE)?;
            let value = serde_json::to_vec(order)?;
            table.insert(order.id.as_str(), value.as_slice())?;
        }
        if let Some(table_number) = &order.table_number {
            let mut index = txn.open_table(TABLE_ORDERS_TABLE)?;
            index.insert((table_number.as_str(), order.id.as_str()), ())?;
        }
        Ok(())
    }

    /// Persist changes to an existing order (index untouched)
    pub fn update_order(&self, txn: &WriteTransaction, order: &ChildOrder) -> StorageResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let value = serde_json::to_vec(order)?;
        table.insert(order.id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Remove an order and its table index entry
    pub fn delete_order(&self, txn: &WriteTransaction, order: &ChildOrder) -> StorageResult<()> {
        {
            let mut table = txn.open_table(ORDERS_TABLE)?;
            table.remove(order.id.as_str())?;
        }
        if let Some(table_number) = &order.table_number {
            let mut index = txn.open_table(TABLE_ORDERS_TABLE)?;
            index.remove((table_number.as_str(), order.id.as_str()))?;
        }
        Ok(())
    }

    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<ChildOrder>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<ChildOrder>> {
        let table = txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All orders for a table, sorted by creation time.
    ///
    /// The index is venue-scale (a handful of orders per table); a full
    /// index scan is cheaper than maintaining range bounds over string
    /// tuples.
    pub fn orders_for_table(&self, table_number: &str) -> StorageResult<Vec<ChildOrder>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(TABLE_ORDERS_TABLE)?;
        let orders_table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in index.iter()? {
            let (key, _) = result?;
            let (table, order_id) = key.value();
            if table != table_number {
                continue;
            }
            if let Some(guard) = orders_table.get(order_id)? {
                orders.push(serde_json::from_slice::<ChildOrder>(guard.value())?);
            }
        }
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    pub fn orders_for_table_txn(
        &self,
        txn: &WriteTransaction,
        table_number: &str,
    ) -> StorageResult<Vec<ChildOrder>> {
        let mut ids = Vec::new();
        {
            let index = txn.open_table(TABLE_ORDERS_TABLE)?;
            for result in index.iter()? {
                let (key, _) = result?;
                let (table, order_id) = key.value();
                if table == table_number {
                    ids.push(order_id.to_string());
                }
            }
        }

        let orders_table = txn.open_table(ORDERS_TABLE)?;
        let mut orders = Vec::new();
        for id in ids {
            if let Some(guard) = orders_table.get(id.as_str())? {
                orders.push(serde_json::from_slice::<ChildOrder>(guard.value())?);
            }
        }
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    /// Number of open (processing or pending) child orders, for the
    /// startup recovery report
    pub fn count_open_orders(&self) -> StorageResult<usize> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        let mut count = 0;
        for result in table.iter()? {
            let (_, value) = result?;
            let order: ChildOrder = serde_json::from_slice(value.value())?;
            if order.is_open() {
                count += 1;
            }
        }
        Ok(count)
    }

    // ========== Consolidated orders ==========

    pub fn insert_consolidated(
        &self,
        txn: &WriteTransaction,
        order: &ConsolidatedOrder,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(CONSOLIDATED_TABLE)?;
        let value = serde_json::to_vec(order)?;
        table.insert(order.id.as_str(), value.as_slice())?;
        Ok(())
    }

    pub fn get_consolidated(&self, id: &str) -> StorageResult<Option<ConsolidatedOrder>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CONSOLIDATED_TABLE)?;
        match table.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_consolidated_txn(
        &self,
        txn: &WriteTransaction,
        id: &str,
    ) -> StorageResult<Option<ConsolidatedOrder>> {
        let table = txn.open_table(CONSOLIDATED_TABLE)?;
        match table.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    // ========== Dining tables ==========

    pub fn put_table(&self, txn: &WriteTransaction, table: &DiningTable) -> StorageResult<()> {
        let mut t = txn.open_table(TABLES_TABLE)?;
        let value = serde_json::to_vec(table)?;
        t.insert(table.table_number.as_str(), value.as_slice())?;
        Ok(())
    }

    pub fn get_table(&self, table_number: &str) -> StorageResult<Option<DiningTable>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLES_TABLE)?;
        match table.get(table_number)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_table_txn(
        &self,
        txn: &WriteTransaction,
        table_number: &str,
    ) -> StorageResult<Option<DiningTable>> {
        let table = txn.open_table(TABLES_TABLE)?;
        match table.get(table_number)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All tables, sorted by table number
    pub fn list_tables(&self) -> StorageResult<Vec<DiningTable>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLES_TABLE)?;
        let mut tables = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            tables.push(serde_json::from_slice::<DiningTable>(value.value())?);
        }
        tables.sort_by(|a, b| a.table_number.cmp(&b.table_number));
        Ok(tables)
    }

    /// Number of occupied tables, for the startup recovery report
    pub fn count_occupied_tables(&self) -> StorageResult<usize> {
        Ok(self
            .list_tables()?
            .iter()
            .filter(|t| t.status == TableStatus::Occupied)
            .count())
    }

    // ========== Sessions ==========

    pub fn put_session(&self, txn: &WriteTransaction, session: &DiningSession) -> StorageResult<()> {
        let mut table = txn.open_table(SESSIONS_TABLE)?;
        let value = serde_json::to_vec(session)?;
        table.insert(session.table_number.as_str(), value.as_slice())?;
        Ok(())
    }

    pub fn get_session(&self, table_number: &str) -> StorageResult<Option<DiningSession>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SESSIONS_TABLE)?;
        match table.get(table_number)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_session_txn(
        &self,
        txn: &WriteTransaction,
        table_number: &str,
    ) -> StorageResult<Option<DiningSession>> {
        let table = txn.open_table(SESSIONS_TABLE)?;
        match table.get(table_number)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn delete_session(&self, txn: &WriteTransaction, table_number: &str) -> StorageResult<()> {
        let mut table = txn.open_table(SESSIONS_TABLE)?;
        table.remove(table_number)?;
        Ok(())
    }

    // ========== Closure tokens ==========

    pub fn put_closure_token(
        &self,
        txn: &WriteTransaction,
        table_number: &str,
        token: &ClosureToken,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(CLOSURE_TOKENS_TABLE)?;
        let value = serde_json::to_vec(token)?;
        table.insert(table_number, value.as_slice())?;
        Ok(())
    }

    pub fn get_closure_token(&self, table_number: &str) -> StorageResult<Option<ClosureToken>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CLOSURE_TOKENS_TABLE)?;
        match table.get(table_number)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_closure_token_txn(
        &self,
        txn: &WriteTransaction,
        table_number: &str,
    ) -> StorageResult<Option<ClosureToken>> {
        let table = txn.open_table(CLOSURE_TOKENS_TABLE)?;
        match table.get(table_number)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }
}

//! Append-only closure audit log
//!
//! Every committed table closure writes one durable record to a separate
//! redb database, independent of the live order store: the child orders
//! it names no longer exist by the time anyone reads it. Records form a
//! SHA256 hash chain; there is no delete or update interface.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Audit entries: key = sequence, value = JSON ClosureAuditRecord
const CLOSURE_AUDIT_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("closure_audit");

/// One committed table closure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClosureAuditRecord {
    /// Global sequence, starts at 1
    pub sequence: u64,
    pub table_number: String,
    pub consolidated_order_id: String,
    pub child_order_ids: Vec<String>,
    pub closed_at: i64,
    pub payment_method: String,
    pub total_amount: f64,
    /// Hash of the previous record ("genesis" for the first)
    pub prev_hash: String,
    /// SHA256 over prev_hash + this record's fields
    pub curr_hash: String,
}

/// Fields of a closure before chaining
#[derive(Debug, Clone)]
pub struct ClosureAuditInput {
    pub table_number: String,
    pub consolidated_order_id: String,
    pub child_order_ids: Vec<String>,
    pub closed_at: i64,
    pub payment_method: String,
    pub total_amount: f64,
}

#[derive(Debug, Error)]
pub enum AuditError {
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

    #[error("Hash chain broken at sequence {0}")]
    ChainBroken(u64),
}

pub type AuditResult<T> = Result<T, AuditError>;

/// Closure audit log backed by its own redb database.
///
/// Appends read the last entry and write the next one inside a single
/// write transaction; redb serializes writers, so concurrent closures on
/// different tables cannot fork the chain.
#[derive(Clone)]
pub struct ClosureAuditLog {
    db: Arc<Database>,
}

impl ClosureAuditLog {
    pub fn open(path: impl AsRef<Path>) -> AuditResult<Self> {
        let db = Database::create(path)?;
        let txn = db.begin_write()?;
        {
            let _ = txn.open_table(CLOSURE_AUDIT_TABLE)?;
        }
        txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    pub fn open_in_memory() -> AuditResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let txn = db.begin_write()?;
        {
            let _ = txn.open_table(CLOSURE_AUDIT_TABLE)?;
        }
        txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Append one closure record, extending the hash chain
    pub fn append(&self, input: ClosureAuditInput) -> AuditResult<ClosureAuditRecord> {
        let txn = self.db.begin_write()?;
        let record = {
            let mut table = txn.open_table(CLOSURE_AUDIT_TABLE)?;

            let (sequence, prev_hash) = match table.iter()?.next_back() {
                Some(entry) => {
                    let (key, value) = entry?;
                    let last: ClosureAuditRecord = serde_json::from_slice(value.value())?;
                    (key.value() + 1, last.curr_hash)
                }
                None => (1, "genesis".to_string()),
            };

            let curr_hash = compute_hash(&prev_hash, sequence, &input);
            let record = ClosureAuditRecord {
                sequence,
                table_number: input.table_number,
                consolidated_order_id: input.consolidated_order_id,
                child_order_ids: input.child_order_ids,
                closed_at: input.closed_at,
                payment_method: input.payment_method,
                total_amount: input.total_amount,
                prev_hash,
                curr_hash,
            };

            let value = serde_json::to_vec(&record)?;
            table.insert(record.sequence, value.as_slice())?;
            record
        };
        txn.commit()?;
        Ok(record)
    }

    /// All records in sequence order
    pub fn entries(&self) -> AuditResult<Vec<ClosureAuditRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CLOSURE_AUDIT_TABLE)?;
        let mut entries = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            entries.push(serde_json::from_slice::<ClosureAuditRecord>(value.value())?);
        }
        Ok(entries)
    }

    /// Records for one table, in sequence order
    pub fn entries_for_table(&self, table_number: &str) -> AuditResult<Vec<ClosureAuditRecord>> {
        Ok(self
            .entries()?
            .into_iter()
            .filter(|r| r.table_number == table_number)
            .collect())
    }

    /// Walk the chain and verify every hash link
    pub fn verify_chain(&self) -> AuditResult<()> {
        let mut prev_hash = "genesis".to_string();
        for record in self.entries()? {
            if record.prev_hash != prev_hash {
                return Err(AuditError::ChainBroken(record.sequence));
            }
            let input = ClosureAuditInput {
                table_number: record.table_number.clone(),
                consolidated_order_id: record.consolidated_order_id.clone(),
                child_order_ids: record.child_order_ids.clone(),
                closed_at: record.closed_at,
                payment_method: record.payment_method.clone(),
                total_amount: record.total_amount,
            };
            let expected = compute_hash(&record.prev_hash, record.sequence, &input);
            if record.curr_hash != expected {
                return Err(AuditError::ChainBroken(record.sequence));
            }
            prev_hash = record.curr_hash;
        }
        Ok(())
    }
}

fn compute_hash(prev_hash: &str, sequence: u64, input: &ClosureAuditInput) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prev_hash.as_bytes());
    hasher.update(sequence.to_be_bytes());
    hasher.update(input.table_number.as_bytes());
    hasher.update(input.consolidated_order_id.as_bytes());
    for id in &input.child_order_ids {
        hasher.update(id.as_bytes());
    }
    hasher.update(input.closed_at.to_be_bytes());
    hasher.update(input.payment_method.as_bytes());
    hasher.update(input.total_amount.to_be_bytes());
    hex::encode(hasher.finalize())
}

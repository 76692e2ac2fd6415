//! OrdersManager - command processing for the table-order lifecycle
//!
//! # Command Flow
//!
//! ```text
//! execute_command(cmd)
//!     ├─ 1. Idempotency check (command_id)
//!     ├─ 2. Pre-generate receipt/consolidated ids where needed
//!     ├─ 3. Begin write transaction (double-check idempotency inside)
//!     ├─ 4. Create CommandContext, convert command to action, execute
//!     ├─ 5. Mark command processed
//!     ├─ 6. Commit transaction
//!     ├─ 7. Publish notifications / append closure audit record
//!     └─ 8. Return response
//! ```
//!
//! Receipt numbers come from a counter living in its own transaction,
//! so they are generated before the main transaction opens (redb does
//! not allow nested writers). A command that then fails wastes a
//! counter value, which is acceptable: receipt numbers are unique, not
//! dense.

mod error;
pub use error::*;

#[cfg(test)]
mod tests;

use super::actions::{
    CancelOrderAction, CloseTableAction, CompleteOrderAction, ConfirmPaymentAction,
    MarkReadyAction, SubmitOrderAction, TableOrdersView, build_table_view,
};
use super::audit::{ClosureAuditInput, ClosureAuditLog};
use super::storage::OrderStorage;
use super::traits::{ActionOutput, CommandContext, CommandHandler, CommandMetadata};
use crate::audit_log;
use crate::services::{Catalog, KitchenClassifier, Notifier, TaxService};
use chrono::Utc;
use chrono_tz::Tz;
use shared::models::DiningTable;
use shared::order::types::{CommandError, CommandErrorCode, CommandResponse, normalize_lines};
use shared::order::{
    ChildOrder, CloseTableOutcome, ConsolidatedOrder, OrderCommand, OrderCommandPayload,
    OrderEvent,
};
use shared::util;
use std::path::Path;
use std::sync::Arc;

/// Tunables resolved from [`Config`](crate::core::Config) at startup
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// How long after the last order a new one may still join the
    /// table's session
    pub join_window_ms: i64,
    /// Hard cap on a session's lifetime
    pub max_lifetime_ms: i64,
    /// How long a committed closure answers replays with its receipt
    pub replay_window_ms: i64,
    /// Business timezone for receipt-number dates
    pub tz: Tz,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            join_window_ms: 2 * 60 * 60 * 1000,
            max_lifetime_ms: 4 * 60 * 60 * 1000,
            replay_window_ms: 600 * 1000,
            tz: chrono_tz::Europe::Madrid,
        }
    }
}

/// OrdersManager for command processing
pub struct OrdersManager {
    storage: OrderStorage,
    /// Append-only closure audit, a separate database so records
    /// survive independently of the live order store
    audit: ClosureAuditLog,
    catalog: Arc<dyn Catalog>,
    tax: Arc<dyn TaxService>,
    notifier: Arc<dyn Notifier>,
    classifier: KitchenClassifier,
    config: ManagerConfig,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("storage", &"<OrderStorage>")
            .field("config", &self.config)
            .finish()
    }
}

impl OrdersManager {
    pub fn new(
        orders_db_path: impl AsRef<Path>,
        audit_db_path: impl AsRef<Path>,
        catalog: Arc<dyn Catalog>,
        tax: Arc<dyn TaxService>,
        notifier: Arc<dyn Notifier>,
        config: ManagerConfig,
    ) -> ManagerResult<Self> {
        let storage = OrderStorage::open(orders_db_path)?;
        let audit = ClosureAuditLog::open(audit_db_path)
            .map_err(|e| ManagerError::Internal(format!("audit store: {e}")))?;
        Ok(Self {
            storage,
            audit,
            catalog,
            tax,
            notifier,
            classifier: KitchenClassifier::new(),
            config,
        })
    }

    /// In-memory manager for tests
    pub fn in_memory(
        catalog: Arc<dyn Catalog>,
        tax: Arc<dyn TaxService>,
        notifier: Arc<dyn Notifier>,
        config: ManagerConfig,
    ) -> ManagerResult<Self> {
        let storage = OrderStorage::open_in_memory()?;
        let audit = ClosureAuditLog::open_in_memory()
            .map_err(|e| ManagerError::Internal(format!("audit store: {e}")))?;
        Ok(Self {
            storage,
            audit,
            catalog,
            tax,
            notifier,
            classifier: KitchenClassifier::new(),
            config,
        })
    }

    pub fn storage(&self) -> &OrderStorage {
        &self.storage
    }

    pub fn audit(&self) -> &ClosureAuditLog {
        &self.audit
    }

    /// Next receipt number: `CMD<yyyymmdd><10000+counter>`, date in the
    /// business timezone, counter crash-safe in redb
    fn next_receipt_number(&self) -> ManagerResult<String> {
        let count = self.storage.next_receipt_count()?;
        let date_str = Utc::now()
            .with_timezone(&self.config.tz)
            .format("%Y%m%d")
            .to_string();
        Ok(format!("CMD{}{}", date_str, 10000 + count))
    }

    /// Execute a command and return the response
    pub fn execute_command(&self, cmd: OrderCommand) -> CommandResponse {
        let command_id = cmd.command_id.clone();

        // Closure has its own flow (outcome type, audit, no
        // processed-command marker: the token is its idempotency)
        if let OrderCommandPayload::CloseTable {
            table_number,
            payment_method,
            force,
        } = &cmd.payload
        {
            return match self.close_table(
                table_number,
                payment_method,
                *force,
                self.metadata_of(&cmd),
            ) {
                Ok(CloseTableOutcome::Closed(receipt)) => {
                    CommandResponse::success(command_id, Some(receipt.order.id))
                }
                Ok(CloseTableOutcome::NeedsConfirmation { order_ids }) => CommandResponse::error(
                    command_id,
                    CommandError::new(
                        CommandErrorCode::ConfirmationRequired,
                        format!(
                            "{} order(s) still processing; re-invoke with force to close: {}",
                            order_ids.len(),
                            order_ids.join(", ")
                        ),
                    ),
                ),
                Err(err) => CommandResponse::error(command_id, err.into()),
            };
        }

        match self.process_command(cmd) {
            Ok((response, events)) => {
                self.publish(&events);
                response
            }
            Err(err) => CommandResponse::error(command_id, err.into()),
        }
    }

    fn metadata_of(&self, cmd: &OrderCommand) -> CommandMetadata {
        CommandMetadata {
            command_id: cmd.command_id.clone(),
            operator_id: cmd.operator_id.clone(),
            operator_name: cmd.operator_name.clone(),
            timestamp: cmd.timestamp,
        }
    }

    /// Process a child-order command inside one write transaction
    fn process_command(
        &self,
        cmd: OrderCommand,
    ) -> ManagerResult<(CommandResponse, Vec<OrderEvent>)> {
        tracing::debug!(command_id = %cmd.command_id, payload = ?cmd.payload, "Processing command");

        // 1. Idempotency check (before transaction)
        if self.storage.is_command_processed(&cmd.command_id)? {
            tracing::warn!(command_id = %cmd.command_id, "Duplicate command");
            return Ok((CommandResponse::duplicate(cmd.command_id), vec![]));
        }

        // 2. Pre-generate the receipt number outside the transaction
        let pre_generated_receipt = match &cmd.payload {
            OrderCommandPayload::CompleteOrder { .. } => Some(self.next_receipt_number()?),
            _ => None,
        };

        // 3. Begin write transaction and double-check idempotency
        let txn = self.storage.begin_write()?;
        if self
            .storage
            .is_command_processed_txn(&txn, &cmd.command_id)?
        {
            return Ok((CommandResponse::duplicate(cmd.command_id), vec![]));
        }

        let metadata = self.metadata_of(&cmd);
        let mut ctx = CommandContext::new(
            &txn,
            &self.storage,
            self.catalog.as_ref(),
            self.tax.as_ref(),
            &self.classifier,
            util::now_millis(),
        );

        // 4. Convert to action and execute
        let output: ActionOutput = match cmd.payload {
            OrderCommandPayload::SubmitOrder {
                table_number,
                items,
                cart,
            } => SubmitOrderAction {
                table_number,
                items: normalize_lines(items, cart),
                join_window_ms: self.config.join_window_ms,
                max_lifetime_ms: self.config.max_lifetime_ms,
            }
            .execute(&mut ctx, &metadata)
            .map_err(ManagerError::from)?,
            OrderCommandPayload::MarkReady { order_id, kitchen } => {
                MarkReadyAction { order_id, kitchen }
                    .execute(&mut ctx, &metadata)
                    .map_err(ManagerError::from)?
            }
            OrderCommandPayload::ConfirmPayment { order_id } => ConfirmPaymentAction { order_id }
                .execute(&mut ctx, &metadata)
                .map_err(ManagerError::from)?,
            OrderCommandPayload::CompleteOrder {
                order_id,
                payment_method,
            } => {
                let receipt_number = pre_generated_receipt.ok_or_else(|| {
                    ManagerError::Internal(
                        "receipt_number must be pre-generated for CompleteOrder".to_string(),
                    )
                })?;
                CompleteOrderAction {
                    order_id,
                    payment_method,
                    receipt_number,
                }
                .execute(&mut ctx, &metadata)
                .map_err(ManagerError::from)?
            }
            OrderCommandPayload::CancelOrder { order_id, reason } => {
                CancelOrderAction { order_id, reason }
                    .execute(&mut ctx, &metadata)
                    .map_err(ManagerError::from)?
            }
            OrderCommandPayload::CloseTable { .. } => {
                return Err(ManagerError::Internal(
                    "CloseTable is handled by close_table".to_string(),
                ));
            }
        };

        // 5-6. Mark processed and commit
        self.storage.mark_command_processed(&txn, &cmd.command_id)?;
        txn.commit().map_err(super::storage::StorageError::from)?;

        let order = output.order.ok_or_else(|| {
            ManagerError::Internal("child-order action produced no order".to_string())
        })?;
        Ok((
            CommandResponse::applied(cmd.command_id, order),
            output.events,
        ))
    }

    /// Close a table: consolidate its open orders inside one write
    /// transaction. A NeedsConfirmation outcome aborts the transaction
    /// so the prompt leaves no trace.
    pub fn close_table(
        &self,
        table_number: &str,
        payment_method: &str,
        force: bool,
        metadata: CommandMetadata,
    ) -> ManagerResult<CloseTableOutcome> {
        let action = CloseTableAction {
            table_number: table_number.to_string(),
            payment_method: payment_method.to_string(),
            force,
            consolidated_id: util::consolidated_id(),
            receipt_number: self.next_receipt_number()?,
            replay_window_ms: self.config.replay_window_ms,
        };

        let txn = self.storage.begin_write()?;
        let mut ctx = CommandContext::new(
            &txn,
            &self.storage,
            self.catalog.as_ref(),
            self.tax.as_ref(),
            &self.classifier,
            util::now_millis(),
        );
        let output = action
            .execute(&mut ctx, &metadata)
            .map_err(ManagerError::from)?;
        let outcome = output.closure.ok_or_else(|| {
            ManagerError::Internal("close action produced no outcome".to_string())
        })?;

        match &outcome {
            CloseTableOutcome::NeedsConfirmation { order_ids } => {
                txn.abort().map_err(super::storage::StorageError::from)?;
                tracing::info!(
                    table_number = %table_number,
                    order_ids = ?order_ids,
                    "Closure needs confirmation; nothing mutated"
                );
            }
            CloseTableOutcome::Closed(receipt) => {
                txn.commit().map_err(super::storage::StorageError::from)?;
                if !receipt.replay {
                    self.record_closure(&receipt.order, &metadata);
                    self.publish(&output.events);
                }
            }
        }
        Ok(outcome)
    }

    /// Post-commit closure bookkeeping. The receipt is already durable;
    /// an audit failure is logged, never surfaced.
    fn record_closure(&self, order: &ConsolidatedOrder, metadata: &CommandMetadata) {
        if let Err(e) = self.audit.append(ClosureAuditInput {
            table_number: order.table_number.clone(),
            consolidated_order_id: order.id.clone(),
            child_order_ids: order.child_order_ids.clone(),
            closed_at: order.closed_at,
            payment_method: order.payment_method.clone(),
            total_amount: order.total,
        }) {
            tracing::error!(
                consolidated_order_id = %order.id,
                error = %e,
                "Failed to append closure audit record"
            );
        }
        audit_log!(
            metadata.operator_id.as_str(),
            "close_table",
            order.id.as_str(),
            format!(
                "table={} total={:.2} method={} children={}",
                order.table_number,
                order.total,
                order.payment_method,
                order.child_order_ids.len()
            )
            .as_str()
        );
    }

    fn publish(&self, events: &[OrderEvent]) {
        for event in events {
            tracing::debug!(
                event_id = %event.event_id,
                event_type = %event.event_type,
                order_id = %event.order_id,
                "Publishing event"
            );
            self.notifier.publish(event);
        }
    }

    // ========== Read side ==========

    pub fn get_order(&self, order_id: &str) -> ManagerResult<Option<ChildOrder>> {
        Ok(self.storage.get_order(order_id)?)
    }

    pub fn get_consolidated(&self, id: &str) -> ManagerResult<Option<ConsolidatedOrder>> {
        Ok(self.storage.get_consolidated(id)?)
    }

    pub fn list_tables(&self) -> ManagerResult<Vec<DiningTable>> {
        Ok(self.storage.list_tables()?)
    }

    /// Display view of a table's active orders
    pub fn query_table(&self, table_number: &str) -> ManagerResult<TableOrdersView> {
        if self.storage.get_table(table_number)?.is_none() {
            return Err(ManagerError::TableNotFound(table_number.to_string()));
        }
        let orders = self.storage.orders_for_table(table_number)?;
        Ok(build_table_view(
            table_number,
            &orders,
            self.catalog.as_ref(),
            &self.classifier,
        ))
    }

    // ========== Startup ==========

    /// Seed the floor plan when the store has no tables yet
    pub fn seed_tables(&self, count: u32, capacity: i32) -> ManagerResult<usize> {
        if !self.storage.list_tables()?.is_empty() {
            return Ok(0);
        }
        let txn = self.storage.begin_write()?;
        for n in 1..=count {
            self.storage
                .put_table(&txn, &DiningTable::new(n.to_string(), capacity))?;
        }
        txn.commit().map_err(super::storage::StorageError::from)?;
        tracing::info!(count, capacity, "Seeded dining tables");
        Ok(count as usize)
    }

    /// Log what survived a restart (redb keeps live state on disk)
    pub fn log_recovery(&self) -> ManagerResult<()> {
        let open_orders = self.storage.count_open_orders()?;
        let occupied = self.storage.count_occupied_tables()?;
        tracing::info!(
            open_orders,
            occupied_tables = occupied,
            "Recovered live state from storage"
        );
        Ok(())
    }
}

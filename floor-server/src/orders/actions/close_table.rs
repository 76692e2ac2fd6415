//! CloseTable command handler - the consolidation algorithm
//!
//! Validates readiness across every open child order of a table, merges
//! them into one consolidated order, realizes tax exactly once, deletes
//! the children and frees the table. Everything happens inside the one
//! write transaction the manager opened; a crash mid-sequence rolls
//! back to the pre-closure state.

use crate::orders::money::{self, to_decimal, to_f64};
use crate::orders::storage::ClosureToken;
use crate::orders::traits::{
    ActionOutput, CommandContext, CommandHandler, CommandMetadata, OrderError,
};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_TABLE_NUMBER_LEN, validate_order_text,
};
use rust_decimal::Decimal;
use shared::order::types::ItemSnapshot;
use shared::order::{
    BlockedOrder, ChildOrder, CloseTableOutcome, CloseTableReceipt, ConsolidatedOrder,
    EventPayload, KitchenType, OrderEvent, OrderEventType, OrderStatus,
};

/// CloseTable action. The consolidated id and receipt number are
/// generated by the manager before the transaction opens; on any
/// non-Closed outcome they are simply discarded.
#[derive(Debug, Clone)]
pub struct CloseTableAction {
    pub table_number: String,
    pub payment_method: String,
    /// Second-call override: force non-mixed Processing orders to
    /// Pending instead of prompting
    pub force: bool,
    pub consolidated_id: String,
    pub receipt_number: String,
    pub replay_window_ms: i64,
}

impl CommandHandler for CloseTableAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<ActionOutput, OrderError> {
        validate_order_text(&self.table_number, "table_number", MAX_TABLE_NUMBER_LEN)?;
        validate_order_text(&self.payment_method, "payment_method", MAX_NAME_LEN)?;

        let mut table = ctx.load_table(&self.table_number)?;
        let mut open: Vec<ChildOrder> = ctx
            .orders_for_table(&self.table_number)?
            .into_iter()
            .filter(|o| o.is_open())
            .collect();

        // No active orders: either a replay of a committed closure or a
        // genuine miss
        if open.is_empty() {
            if let Some(token) = ctx.get_closure_token(&self.table_number)?
                && ctx.now - token.closed_at <= self.replay_window_ms
                && let Some(order) = ctx.get_consolidated(&token.consolidated_order_id)?
            {
                tracing::info!(
                    table_number = %self.table_number,
                    consolidated_order_id = %order.id,
                    "Closure replay: returning committed receipt"
                );
                return Ok(ActionOutput::closure(
                    CloseTableOutcome::Closed(CloseTableReceipt {
                        order,
                        replay: true,
                    }),
                    vec![],
                ));
            }
            return Err(OrderError::NoOpenOrders(self.table_number.clone()));
        }

        // Mixed orders must already be fully prepared; nothing is forced
        let blocked: Vec<BlockedOrder> = open
            .iter()
            .filter(|o| {
                o.status == OrderStatus::Processing
                    && o.kitchen_type == KitchenType::Mixed
                    && !o.readiness.is_complete()
            })
            .map(|o| BlockedOrder {
                order_id: o.id.clone(),
                pending_kitchens: o.pending_kitchens(),
            })
            .collect();
        if !blocked.is_empty() {
            return Err(OrderError::ClosureBlocked(blocked));
        }

        // Non-mixed orders still Processing need a human decision on
        // the first call; a forced call transitions them here
        let unready: Vec<String> = open
            .iter()
            .filter(|o| o.status == OrderStatus::Processing && o.kitchen_type != KitchenType::Mixed)
            .map(|o| o.id.clone())
            .collect();
        let mut events = Vec::new();
        if !unready.is_empty() {
            if !self.force {
                return Ok(ActionOutput::closure(
                    CloseTableOutcome::NeedsConfirmation {
                        order_ids: unready,
                    },
                    vec![],
                ));
            }
            for order in open.iter_mut().filter(|o| unready.contains(&o.id)) {
                order.readiness.force_complete();
                order.status = OrderStatus::Pending;
                order.push_note(format!(
                    "Readiness forced complete at closure by {}",
                    metadata.operator_name
                ));
                order.updated_at = ctx.now;
                events.push(OrderEvent::new(
                    order.id.clone(),
                    metadata.operator_id.clone(),
                    metadata.operator_name.clone(),
                    metadata.command_id.clone(),
                    OrderEventType::OrderReady,
                    EventPayload::OrderReady {
                        table_number: Some(self.table_number.clone()),
                        kitchen_type: order.kitchen_type,
                        forced: true,
                    },
                ));
            }
        }

        // Post-check: anything not Pending now indicates a logic bug
        let offenders: Vec<String> = open
            .iter()
            .filter(|o| o.status != OrderStatus::Pending)
            .map(|o| o.id.clone())
            .collect();
        if !offenders.is_empty() {
            return Err(OrderError::InconsistentState(offenders));
        }

        // Merge: every child contributes its pre-tax item subtotal,
        // never its deferred total
        let mut items: Vec<ItemSnapshot> = Vec::new();
        let mut subtotal = Decimal::ZERO;
        for child in &open {
            let child_subtotal = money::items_subtotal(&child.items);
            if child_subtotal > 0.0 {
                subtotal += to_decimal(child_subtotal);
            } else if child.subtotal > 0.0 {
                tracing::warn!(
                    order_id = %child.id,
                    stored_subtotal = child.subtotal,
                    "Child items produce no subtotal; falling back to stored pre-tax subtotal"
                );
                subtotal += to_decimal(child.subtotal);
            }
            items.extend(child.items.iter().cloned());
        }
        let subtotal = to_f64(subtotal);
        let tax = ctx.tax.compute(subtotal);
        let total = money::add(subtotal, tax);

        let child_order_ids: Vec<String> = open.iter().map(|o| o.id.clone()).collect();
        let consolidated = ConsolidatedOrder {
            id: self.consolidated_id.clone(),
            table_number: self.table_number.clone(),
            child_order_ids: child_order_ids.clone(),
            items,
            subtotal,
            tax,
            total,
            payment_method: self.payment_method.clone(),
            status: OrderStatus::Completed,
            receipt_number: self.receipt_number.clone(),
            closed_at: ctx.now,
        };

        ctx.insert_consolidated(&consolidated)?;
        for child in &open {
            ctx.delete_order(child)?;
        }
        ctx.end_session(&self.table_number)?;
        table.release();
        ctx.save_table(&table)?;
        ctx.put_closure_token(
            &self.table_number,
            &ClosureToken {
                consolidated_order_id: consolidated.id.clone(),
                closed_at: ctx.now,
            },
        )?;

        events.push(OrderEvent::new(
            consolidated.id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            OrderEventType::TableClosed,
            EventPayload::TableClosed {
                table_number: self.table_number.clone(),
                child_order_ids,
                total,
                payment_method: self.payment_method.clone(),
            },
        ));

        Ok(ActionOutput::closure(
            CloseTableOutcome::Closed(CloseTableReceipt {
                order: consolidated,
                replay: false,
            }),
            events,
        ))
    }
}

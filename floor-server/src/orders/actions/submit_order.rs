//! SubmitOrder command handler
//!
//! Creates one child order: resolves catalog prices into snapshots,
//! classifies the kitchen type, applies the tax-deferral policy and
//! joins (or starts) the table's dining session.

use crate::orders::money::{self, validate_item_input, validate_price};
use crate::orders::traits::{
    ActionOutput, CommandContext, CommandHandler, CommandMetadata, OrderError,
};
use crate::services::catalog::find_addon;
use crate::utils::validation::{
    MAX_NOTE_LEN, MAX_TABLE_NUMBER_LEN, validate_order_optional_text, validate_order_text,
};
use shared::models::DiningSession;
use shared::order::types::{AddonSnapshot, CommandErrorCode, ItemInput, ItemSnapshot};
use shared::order::{ChildOrder, EventPayload, OrderEvent, OrderEventType, OrderStatus, Readiness};
use shared::util;

/// SubmitOrder action. `table_number` absent means pickup.
#[derive(Debug, Clone)]
pub struct SubmitOrderAction {
    pub table_number: Option<String>,
    /// Canonical item list (both submission shapes already normalized)
    pub items: Vec<ItemInput>,
    pub join_window_ms: i64,
    pub max_lifetime_ms: i64,
}

impl CommandHandler for SubmitOrderAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<ActionOutput, OrderError> {
        // 1. Validate input shape
        if let Some(table_number) = &self.table_number {
            if table_number.trim().is_empty() {
                return Err(OrderError::InvalidOperation(
                    CommandErrorCode::InvalidOperation,
                    "table_number must not be empty".to_string(),
                ));
            }
            validate_order_text(table_number, "table_number", MAX_TABLE_NUMBER_LEN)?;
        }
        if self.items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        // 2. Resolve catalog prices into snapshots. Items that fail to
        // resolve are skipped with a warning instead of aborting the
        // whole order.
        let mut snapshots: Vec<ItemSnapshot> = Vec::with_capacity(self.items.len());
        for input in &self.items {
            validate_item_input(input)?;
            validate_order_optional_text(&input.note, "note", MAX_NOTE_LEN)?;

            let Some(item) = ctx.catalog.item(input.product_id).filter(|i| i.is_active) else {
                tracing::warn!(
                    product_id = input.product_id,
                    "Skipping unresolvable item in submission"
                );
                continue;
            };
            validate_price(item.price, "unit_price")?;

            let mut addons: Vec<AddonSnapshot> = Vec::with_capacity(input.addons.len());
            for selection in &input.addons {
                let Some(addon) = find_addon(&item, selection.addon_id) else {
                    tracing::warn!(
                        product_id = input.product_id,
                        addon_id = selection.addon_id,
                        "Skipping unresolvable addon in submission"
                    );
                    continue;
                };
                validate_price(addon.price, "addon_price")?;
                addons.push(AddonSnapshot {
                    addon_id: addon.id,
                    name: addon.name.clone(),
                    price: addon.price,
                    quantity: selection.quantity,
                });
            }

            let line_total = money::line_total(item.price, &addons, input.quantity);
            snapshots.push(ItemSnapshot {
                product_id: item.id,
                name: item.name,
                quantity: input.quantity,
                unit_price: Some(item.price),
                station: item.station,
                note: input.note.clone(),
                addons,
                line_total,
            });
        }
        if snapshots.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        let kitchen_type = ctx.classifier.classify(&snapshots);
        let subtotal = money::items_subtotal(&snapshots);

        // 3. Table side: occupy the table and resolve the session.
        // Pickup side: tax is realized immediately.
        let (session_id, tax, total, tax_deferred) = match &self.table_number {
            Some(table_number) => {
                let mut table = ctx.load_table(table_number)?;
                if !table.accepts_orders() {
                    return Err(OrderError::TableUnavailable(table_number.clone()));
                }
                ctx.tax.validate_deferral()?;

                let session = match ctx.get_session(table_number)? {
                    Some(mut session) if session.is_joinable(ctx.now, self.join_window_ms) => {
                        session.touch(ctx.now);
                        session
                    }
                    _ => DiningSession::new(
                        util::session_id(),
                        table_number.clone(),
                        ctx.now,
                        self.max_lifetime_ms,
                    ),
                };
                ctx.save_session(&session)?;
                table.occupy(&session.id);
                ctx.save_table(&table)?;

                (Some(session.id), 0.0, subtotal, true)
            }
            None => {
                let tax = ctx.tax.compute(subtotal);
                (None, tax, money::add(subtotal, tax), false)
            }
        };

        let order = ChildOrder {
            id: util::order_id(),
            table_number: self.table_number.clone(),
            session_id,
            status: OrderStatus::Processing,
            kitchen_type,
            readiness: Readiness::for_kitchen_type(kitchen_type),
            items: snapshots,
            subtotal,
            tax,
            total,
            tax_deferred,
            payment_method: None,
            receipt_number: None,
            notes: vec![],
            created_at: ctx.now,
            updated_at: ctx.now,
        };
        ctx.insert_order(&order)?;

        let event = OrderEvent::new(
            order.id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            OrderEventType::OrderPlaced,
            EventPayload::OrderPlaced {
                table_number: order.table_number.clone(),
                session_id: order.session_id.clone(),
                total: order.total,
            },
        );

        Ok(ActionOutput::order(order, vec![event]))
    }
}

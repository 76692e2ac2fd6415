//! CompleteOrder command handler
//!
//! Settles a pickup order on its own: applies the payment method,
//! realizes tax over the pre-tax subtotal and assigns the receipt
//! reference. Table orders settle through table closure instead.

use crate::orders::money;
use crate::orders::traits::{
    ActionOutput, CommandContext, CommandHandler, CommandMetadata, OrderError,
};
use crate::utils::validation::{MAX_NAME_LEN, validate_order_text};
use shared::order::types::CommandErrorCode;
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

/// CompleteOrder action. The receipt number is generated by the manager
/// before the transaction opens (the counter lives in its own
/// transaction).
#[derive(Debug, Clone)]
pub struct CompleteOrderAction {
    pub order_id: String,
    pub payment_method: String,
    pub receipt_number: String,
}

impl CommandHandler for CompleteOrderAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<ActionOutput, OrderError> {
        validate_order_text(&self.payment_method, "payment_method", MAX_NAME_LEN)?;

        let mut order = ctx.load_order(&self.order_id)?;

        if order.is_table_order() {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::InvalidOperation,
                format!(
                    "order {} belongs to table {}; settle it by closing the table",
                    self.order_id,
                    order.table_number.as_deref().unwrap_or_default()
                ),
            ));
        }
        match order.status {
            OrderStatus::Completed => {
                return Err(OrderError::OrderAlreadyCompleted(self.order_id.clone()));
            }
            OrderStatus::Cancelled => {
                return Err(OrderError::OrderAlreadyCancelled(self.order_id.clone()));
            }
            OrderStatus::Processing | OrderStatus::Pending => {}
        }

        // Tax is realized here, over the pre-tax subtotal
        order.tax = ctx.tax.compute(order.subtotal);
        order.total = money::add(order.subtotal, order.tax);
        order.tax_deferred = false;
        order.status = OrderStatus::Completed;
        order.payment_method = Some(self.payment_method.clone());
        order.receipt_number = Some(self.receipt_number.clone());
        order.updated_at = ctx.now;
        ctx.update_order(&order)?;

        let event = OrderEvent::new(
            order.id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            OrderEventType::OrderCompleted,
            EventPayload::OrderCompleted {
                receipt_number: self.receipt_number.clone(),
                total: order.total,
                payment_method: self.payment_method.clone(),
            },
        );

        Ok(ActionOutput::order(order, vec![event]))
    }
}

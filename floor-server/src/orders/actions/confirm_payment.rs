//! ConfirmPayment command handler
//!
//! Records payment received for an order. Idempotent: confirming an
//! already-completed order acknowledges without mutating. A cancelled
//! order is never resurrected.

use crate::orders::traits::{
    ActionOutput, CommandContext, CommandHandler, CommandMetadata, OrderError,
};
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

/// ConfirmPayment action
#[derive(Debug, Clone)]
pub struct ConfirmPaymentAction {
    pub order_id: String,
}

impl CommandHandler for ConfirmPaymentAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<ActionOutput, OrderError> {
        let mut order = ctx.load_order(&self.order_id)?;

        match order.status {
            OrderStatus::Cancelled => {
                return Err(OrderError::OrderAlreadyCancelled(self.order_id.clone()));
            }
            OrderStatus::Completed => {
                // Already settled; acknowledge without a second note
                return Ok(ActionOutput::order(order, vec![]));
            }
            OrderStatus::Processing | OrderStatus::Pending => {}
        }

        order.status = OrderStatus::Completed;
        order.push_note(format!(
            "Payment confirmed by {} ({})",
            metadata.operator_name, metadata.operator_id
        ));
        order.updated_at = ctx.now;
        ctx.update_order(&order)?;

        let event = OrderEvent::new(
            order.id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            OrderEventType::PaymentConfirmed,
            EventPayload::PaymentConfirmed {},
        );

        Ok(ActionOutput::order(order, vec![event]))
    }
}

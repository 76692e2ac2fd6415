//! CancelOrder command handler
//!
//! Cancels an open child order with an optional reason. Cancelled
//! orders stay stored (for the record) but drop out of closure, query
//! and session totals.

use crate::orders::traits::{
    ActionOutput, CommandContext, CommandHandler, CommandMetadata, OrderError,
};
use crate::utils::validation::{MAX_NOTE_LEN, validate_order_optional_text};
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

/// CancelOrder action
#[derive(Debug, Clone)]
pub struct CancelOrderAction {
    pub order_id: String,
    pub reason: Option<String>,
}

impl CommandHandler for CancelOrderAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<ActionOutput, OrderError> {
        validate_order_optional_text(&self.reason, "reason", MAX_NOTE_LEN)?;

        let mut order = ctx.load_order(&self.order_id)?;
        match order.status {
            OrderStatus::Completed => {
                return Err(OrderError::OrderAlreadyCompleted(self.order_id.clone()));
            }
            OrderStatus::Cancelled => {
                return Err(OrderError::OrderAlreadyCancelled(self.order_id.clone()));
            }
            OrderStatus::Processing | OrderStatus::Pending => {}
        }

        order.status = OrderStatus::Cancelled;
        match &self.reason {
            Some(reason) => order.push_note(format!(
                "Cancelled by {}: {}",
                metadata.operator_name, reason
            )),
            None => order.push_note(format!("Cancelled by {}", metadata.operator_name)),
        }
        order.updated_at = ctx.now;
        ctx.update_order(&order)?;

        let event = OrderEvent::new(
            order.id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            OrderEventType::OrderCancelled,
            EventPayload::OrderCancelled {
                reason: self.reason.clone(),
            },
        );

        Ok(ActionOutput::order(order, vec![event]))
    }
}

//! MarkReady command handler
//!
//! A station reports its part of an order prepared. Drives the
//! Processing → Pending transition once every participating station has
//! reported.

use crate::orders::traits::{
    ActionOutput, CommandContext, CommandHandler, CommandMetadata, OrderError,
};
use shared::models::KitchenStation;
use shared::order::types::CommandErrorCode;
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

/// MarkReady action
#[derive(Debug, Clone)]
pub struct MarkReadyAction {
    pub order_id: String,
    pub kitchen: KitchenStation,
}

impl CommandHandler for MarkReadyAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<ActionOutput, OrderError> {
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

        // Naming the wrong station for a single-kitchen order is a
        // caller mistake, not a no-op
        if !order.kitchen_type.involves(self.kitchen) {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::InvalidKitchen,
                format!(
                    "order {} is {}-only; {} kitchen does not apply",
                    self.order_id,
                    order.kitchen_type.name(),
                    self.kitchen.name()
                ),
            ));
        }

        order.readiness.mark(self.kitchen);

        // The ready notification fires exactly once, on the transition
        let mut events = Vec::new();
        if order.status == OrderStatus::Processing && order.readiness.is_complete() {
            order.status = OrderStatus::Pending;
            events.push(OrderEvent::new(
                order.id.clone(),
                metadata.operator_id.clone(),
                metadata.operator_name.clone(),
                metadata.command_id.clone(),
                OrderEventType::OrderReady,
                EventPayload::OrderReady {
                    table_number: order.table_number.clone(),
                    kitchen_type: order.kitchen_type,
                    forced: false,
                },
            ));
        }

        order.updated_at = ctx.now;
        ctx.update_order(&order)?;

        Ok(ActionOutput::order(order, events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::storage::OrderStorage;
    use crate::services::{InMemoryCatalog, KitchenClassifier, RateTaxService};
    use shared::order::{ChildOrder, KitchenType, Readiness};
    use shared::util;

    fn metadata() -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            operator_id: "op-1".to_string(),
            operator_name: "Ana".to_string(),
            timestamp: util::now_millis(),
        }
    }

    fn seed_order(storage: &OrderStorage, kitchen_type: KitchenType) -> ChildOrder {
        let order = ChildOrder {
            id: util::order_id(),
            table_number: Some("12".to_string()),
            session_id: Some("ses-1".to_string()),
            status: OrderStatus::Processing,
            kitchen_type,
            readiness: Readiness::for_kitchen_type(kitchen_type),
            items: vec![],
            subtotal: 10.0,
            tax: 0.0,
            total: 10.0,
            tax_deferred: true,
            payment_method: None,
            receipt_number: None,
            notes: vec![],
            created_at: util::now_millis(),
            updated_at: util::now_millis(),
        };
        let txn = storage.begin_write().unwrap();
        storage.insert_order(&txn, &order).unwrap();
        txn.commit().unwrap();
        order
    }

    fn mark(
        storage: &OrderStorage,
        order_id: &str,
        kitchen: KitchenStation,
    ) -> Result<ActionOutput, OrderError> {
        let catalog = InMemoryCatalog::default_menu();
        let tax = RateTaxService::new(10.0, true);
        let classifier = KitchenClassifier::new();
        let action = MarkReadyAction {
            order_id: order_id.to_string(),
            kitchen,
        };
        let txn = storage.begin_write().unwrap();
        let mut ctx =
            CommandContext::new(&txn, storage, &catalog, &tax, &classifier, util::now_millis());
        let output = action.execute(&mut ctx, &metadata())?;
        txn.commit().unwrap();
        Ok(output)
    }

    #[test]
    fn test_single_kitchen_marks_pending_immediately() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let order = seed_order(&storage, KitchenType::Food);

        let output = mark(&storage, &order.id, KitchenStation::Food).unwrap();
        let updated = output.order.unwrap();
        assert_eq!(updated.status, OrderStatus::Pending);
        assert!(updated.readiness.is_complete());
        assert_eq!(output.events.len(), 1);
        assert_eq!(output.events[0].event_type, OrderEventType::OrderReady);
    }

    #[test]
    fn test_wrong_kitchen_rejected_for_single() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let order = seed_order(&storage, KitchenType::Food);

        let err = mark(&storage, &order.id, KitchenStation::Beverage).unwrap_err();
        assert!(matches!(
            err,
            OrderError::InvalidOperation(CommandErrorCode::InvalidKitchen, _)
        ));
        // Nothing changed
        let stored = storage.get_order(&order.id).unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Processing);
    }

    #[test]
    fn test_mixed_needs_both_kitchens() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let order = seed_order(&storage, KitchenType::Mixed);

        let output = mark(&storage, &order.id, KitchenStation::Food).unwrap();
        assert_eq!(output.order.as_ref().unwrap().status, OrderStatus::Processing);
        assert!(output.events.is_empty());

        let output = mark(&storage, &order.id, KitchenStation::Beverage).unwrap();
        assert_eq!(output.order.as_ref().unwrap().status, OrderStatus::Pending);
        assert_eq!(output.events.len(), 1);
    }

    #[test]
    fn test_remark_after_pending_emits_no_second_event() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let order = seed_order(&storage, KitchenType::Food);

        mark(&storage, &order.id, KitchenStation::Food).unwrap();
        let output = mark(&storage, &order.id, KitchenStation::Food).unwrap();
        assert_eq!(output.order.unwrap().status, OrderStatus::Pending);
        assert!(output.events.is_empty());
    }

    #[test]
    fn test_completed_order_rejected() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let mut order = seed_order(&storage, KitchenType::Food);
        order.status = OrderStatus::Completed;
        let txn = storage.begin_write().unwrap();
        storage.update_order(&txn, &order).unwrap();
        txn.commit().unwrap();

        let err = mark(&storage, &order.id, KitchenStation::Food).unwrap_err();
        assert!(matches!(err, OrderError::OrderAlreadyCompleted(_)));
    }

    #[test]
    fn test_unknown_order_rejected() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let err = mark(&storage, "ord-missing", KitchenStation::Food).unwrap_err();
        assert!(matches!(err, OrderError::OrderNotFound(_)));
    }
}

use super::*;
use crate::services::{InMemoryCatalog, LogNotifier, RateTaxService};
use shared::models::{KitchenStation, TableStatus};
use shared::order::types::ItemInput;
use shared::order::{KitchenType, OrderStatus};


/// 10% flat tax, default menu, 12 seeded tables
fn create_test_manager() -> OrdersManager {
    let manager = OrdersManager::in_memory(
        Arc::new(InMemoryCatalog::default_menu()),
        Arc::new(RateTaxService::new(10.0, true)),
        Arc::new(LogNotifier::new()),
        ManagerConfig::default(),
    )
    .unwrap();
    manager.seed_tables(12, 4).unwrap();
    manager
}

fn metadata() -> CommandMetadata {
    CommandMetadata {
        command_id: uuid::Uuid::new_v4().to_string(),
        operator_id: "op-1".to_string(),
        operator_name: "Test Operator".to_string(),
        timestamp: util::now_millis(),
    }
}

fn line(product_id: i64, quantity: i32) -> ItemInput {
    ItemInput {
        product_id,
        quantity,
        note: None,
        addons: vec![],
    }
}

// ========================================================================
// Helpers: drive the lifecycle through execute_command
// ========================================================================

fn submit_cmd(table: Option<&str>, items: Vec<ItemInput>) -> OrderCommand {
    OrderCommand::new(
        OrderCommandPayload::SubmitOrder {
            table_number: table.map(String::from),
            items: Some(items),
            cart: None,
        },
        "op-1",
        "Test Operator",
    )
}

fn submit(manager: &OrdersManager, table: Option<&str>, items: Vec<ItemInput>) -> String {
    let resp = manager.execute_command(submit_cmd(table, items));
    assert!(resp.success, "Failed to submit order: {:?}", resp.error);
    resp.order_id.unwrap()
}

fn mark_ready(manager: &OrdersManager, order_id: &str, kitchen: KitchenStation) {
    let resp = manager.execute_command(OrderCommand::new(
        OrderCommandPayload::MarkReady {
            order_id: order_id.to_string(),
            kitchen,
        },
        "op-1",
        "Test Operator",
    ));
    assert!(resp.success, "Failed to mark ready: {:?}", resp.error);
}

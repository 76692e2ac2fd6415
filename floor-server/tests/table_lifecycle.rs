//! Full table lifecycle against on-disk storage
//!
//! Drives submit → kitchen readiness → closure through a real work
//! directory, restarting the state in between to prove the order
//! survives a process restart.

use floor_server::orders::{CloseTableOutcome, CommandMetadata, OrderCommandPayload, OrderStatus};
use floor_server::{Config, ServerState};
use shared::models::{KitchenStation, TableStatus};
use shared::order::OrderCommand;
use shared::order::types::ItemInput;
use shared::util;

fn test_config(dir: &tempfile::TempDir) -> Config {
    Config::with_overrides(dir.path().to_str().unwrap(), 0)
}

fn metadata() -> CommandMetadata {
    CommandMetadata {
        command_id: uuid::Uuid::new_v4().to_string(),
        operator_id: "op-1".to_string(),
        operator_name: "Integration".to_string(),
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

fn submit(state: &ServerState, table: &str, items: Vec<ItemInput>) -> String {
    let resp = state.orders.execute_command(OrderCommand::new(
        OrderCommandPayload::SubmitOrder {
            table_number: Some(table.to_string()),
            items: Some(items),
            cart: None,
        },
        "op-1",
        "Integration",
    ));
    assert!(resp.success, "submit failed: {:?}", resp.error);
    resp.order_id.unwrap()
}

#[test]
fn test_table_lifecycle_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);

    // Phase 1: take orders and mark the food ready
    let (food_order, beverage_order) = {
        let state = ServerState::initialize(&config).unwrap();
        let food = submit(&state, "3", vec![line(101, 2)]);
        let beverage = submit(&state, "3", vec![line(201, 1)]);

        let resp = state.orders.execute_command(OrderCommand::new(
            OrderCommandPayload::MarkReady {
                order_id: food.clone(),
                kitchen: KitchenStation::Food,
            },
            "op-1",
            "Integration",
        ));
        assert!(resp.success);
        (food, beverage)
    };

    // Phase 2: restart, everything must still be there
    let state = ServerState::initialize(&config).unwrap();
    let recovered = state.orders.get_order(&food_order).unwrap().unwrap();
    assert_eq!(recovered.status, OrderStatus::Pending);
    assert!(recovered.tax_deferred);

    let view = state.orders.query_table("3").unwrap();
    assert_eq!(view.orders.len(), 2);
    assert_eq!(view.running_total, 23.0);

    // Beverage still pending, then closed with both settled
    let resp = state.orders.execute_command(OrderCommand::new(
        OrderCommandPayload::MarkReady {
            order_id: beverage_order.clone(),
            kitchen: KitchenStation::Beverage,
        },
        "op-1",
        "Integration",
    ));
    assert!(resp.success);

    let outcome = state
        .orders
        .close_table("3", "card", false, metadata())
        .unwrap();
    let receipt = match outcome {
        CloseTableOutcome::Closed(receipt) => receipt,
        other => panic!("expected Closed, got {:?}", other),
    };
    assert_eq!(receipt.order.subtotal, 23.0);
    assert_eq!(receipt.order.tax, 2.3);
    assert_eq!(receipt.order.total, 25.3);
    assert!(receipt.order.receipt_number.starts_with("CMD"));

    let table = state.orders.storage().get_table("3").unwrap().unwrap();
    assert_eq!(table.status, TableStatus::Available);

    // Phase 3: restart again, the consolidated order and audit survive
    let consolidated_id = receipt.order.id.clone();
    drop(state);
    let state = ServerState::initialize(&config).unwrap();

    let consolidated = state
        .orders
        .get_consolidated(&consolidated_id)
        .unwrap()
        .unwrap();
    assert_eq!(consolidated.total, 25.3);
    assert!(state.orders.get_order(&food_order).unwrap().is_none());

    let entries = state.orders.audit().entries_for_table("3").unwrap();
    assert_eq!(entries.len(), 1);
    state.orders.audit().verify_chain().unwrap();
}

#[test]
fn test_receipt_counter_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);

    let first = {
        let state = ServerState::initialize(&config).unwrap();
        let order = submit(&state, "1", vec![line(103, 1)]);
        let outcome = state.orders.close_table("1", "cash", true, metadata()).unwrap();
        let _ = order;
        match outcome {
            CloseTableOutcome::Closed(receipt) => receipt.order.receipt_number,
            other => panic!("expected Closed, got {:?}", other),
        }
    };

    let state = ServerState::initialize(&config).unwrap();
    submit(&state, "2", vec![line(103, 1)]);
    let outcome = state.orders.close_table("2", "cash", true, metadata()).unwrap();
    let second = match outcome {
        CloseTableOutcome::Closed(receipt) => receipt.order.receipt_number,
        other => panic!("expected Closed, got {:?}", other),
    };

    // Same day, later counter value
    assert_ne!(first, second);
    assert!(second > first);
}

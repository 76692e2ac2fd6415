//! Dining table API handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::orders::CommandMetadata;
use crate::orders::actions::TableOrdersView;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_TABLE_NUMBER_LEN, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::DiningTable;
use shared::order::{CloseTableOutcome, CloseTableReceipt};
use shared::util;

use crate::api::orders::OperatorInfo;

/// GET /api/tables - the whole floor
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = state.orders.list_tables()?;
    Ok(Json(tables))
}

/// GET /api/tables/:table_number/orders - open orders and running total
pub async fn open_orders(
    State(state): State<ServerState>,
    Path(table_number): Path<String>,
) -> AppResult<Json<TableOrdersView>> {
    let view = state.orders.query_table(&table_number)?;
    Ok(Json(view))
}

/// POST /api/tables/:table_number/close - consolidate and settle
#[derive(Debug, Deserialize)]
pub struct CloseTableRequest {
    pub payment_method: String,
    /// Force readiness on still-processing single-kitchen orders
    #[serde(default)]
    pub force: bool,
    #[serde(flatten)]
    pub operator: OperatorInfo,
}

pub async fn close(
    State(state): State<ServerState>,
    Path(table_number): Path<String>,
    Json(payload): Json<CloseTableRequest>,
) -> AppResult<Json<CloseTableReceipt>> {
    validate_required_text(&table_number, "table_number", MAX_TABLE_NUMBER_LEN)?;
    validate_required_text(&payload.payment_method, "payment_method", MAX_NAME_LEN)?;

    let metadata = CommandMetadata {
        command_id: payload
            .operator
            .command_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        operator_id: payload.operator.operator_id.clone(),
        operator_name: payload.operator.operator_name.clone(),
        timestamp: util::now_millis(),
    };

    let outcome = state.orders.close_table(
        &table_number,
        &payload.payment_method,
        payload.force,
        metadata,
    )?;

    match outcome {
        CloseTableOutcome::Closed(receipt) => Ok(Json(receipt)),
        CloseTableOutcome::NeedsConfirmation { order_ids } => Err(AppError::with_message(
            ErrorCode::ClosureConfirmationRequired,
            "Table has orders still in preparation; repeat with force=true to close anyway",
        )
        .with_detail(
            "order_ids",
            serde_json::to_value(order_ids).unwrap_or_default(),
        )),
    }
}

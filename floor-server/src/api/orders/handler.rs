//! Order API handlers
//!
//! Each mutation endpoint builds an [`OrderCommand`] and feeds it to
//! the manager. A client-supplied `command_id` makes the request
//! idempotent; without one a fresh id is generated per request.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::api::convert::command_error_to_app;
use crate::core::ServerState;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::KitchenStation;
use shared::order::types::{CartLine, CommandResponse, ItemInput};
use shared::order::{ChildOrder, OrderCommand, OrderCommandPayload};

fn default_operator_id() -> String {
    "floor-terminal".to_string()
}

fn default_operator_name() -> String {
    "Floor Terminal".to_string()
}

/// Operator identification, common to every command request
#[derive(Debug, Deserialize)]
pub struct OperatorInfo {
    #[serde(default)]
    pub command_id: Option<String>,
    #[serde(default = "default_operator_id")]
    pub operator_id: String,
    #[serde(default = "default_operator_name")]
    pub operator_name: String,
}

impl OperatorInfo {
    fn command(&self, payload: OrderCommandPayload) -> OrderCommand {
        let cmd = OrderCommand::new(payload, &self.operator_id, &self.operator_name);
        match &self.command_id {
            Some(id) => cmd.with_command_id(id),
            None => cmd,
        }
    }
}

fn into_response(response: CommandResponse) -> AppResult<Json<CommandResponse>> {
    if response.success {
        Ok(Json(response))
    } else {
        let err = response
            .error
            .map(command_error_to_app)
            .unwrap_or_else(|| AppError::internal("command failed without error detail"));
        Err(err)
    }
}

/// POST /api/orders - submit a new table or pickup order
#[derive(Debug, Deserialize)]
pub struct SubmitOrderRequest {
    /// Absent means pickup
    #[serde(default)]
    pub table_number: Option<String>,
    /// Canonical item shape
    #[serde(default)]
    pub items: Option<Vec<ItemInput>>,
    /// Compact cart shape used by handheld terminals
    #[serde(default)]
    pub cart: Option<Vec<CartLine>>,
    #[serde(flatten)]
    pub operator: OperatorInfo,
}

pub async fn submit(
    State(state): State<ServerState>,
    Json(payload): Json<SubmitOrderRequest>,
) -> AppResult<Json<CommandResponse>> {
    let cmd = payload.operator.command(OrderCommandPayload::SubmitOrder {
        table_number: payload.table_number,
        items: payload.items,
        cart: payload.cart,
    });
    into_response(state.orders.execute_command(cmd))
}

/// GET /api/orders/:id - fetch a child order
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ChildOrder>> {
    let order = state
        .orders
        .get_order(&id)?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;
    Ok(Json(order))
}

/// POST /api/orders/:id/ready - a kitchen station reports readiness
#[derive(Debug, Deserialize)]
pub struct MarkReadyRequest {
    pub kitchen: KitchenStation,
    #[serde(flatten)]
    pub operator: OperatorInfo,
}

pub async fn mark_ready(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MarkReadyRequest>,
) -> AppResult<Json<CommandResponse>> {
    let cmd = payload.operator.command(OrderCommandPayload::MarkReady {
        order_id: id,
        kitchen: payload.kitchen,
    });
    into_response(state.orders.execute_command(cmd))
}

/// POST /api/orders/:id/confirm-payment
#[derive(Debug, Deserialize)]
pub struct ConfirmPaymentRequest {
    #[serde(flatten)]
    pub operator: OperatorInfo,
}

pub async fn confirm_payment(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ConfirmPaymentRequest>,
) -> AppResult<Json<CommandResponse>> {
    let cmd = payload
        .operator
        .command(OrderCommandPayload::ConfirmPayment { order_id: id });
    into_response(state.orders.execute_command(cmd))
}

/// POST /api/orders/:id/complete - settle a pickup order
#[derive(Debug, Deserialize)]
pub struct CompleteOrderRequest {
    pub payment_method: String,
    #[serde(flatten)]
    pub operator: OperatorInfo,
}

pub async fn complete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CompleteOrderRequest>,
) -> AppResult<Json<CommandResponse>> {
    validate_required_text(&payload.payment_method, "payment_method", MAX_NAME_LEN)?;
    let cmd = payload.operator.command(OrderCommandPayload::CompleteOrder {
        order_id: id,
        payment_method: payload.payment_method,
    });
    into_response(state.orders.execute_command(cmd))
}

/// POST /api/orders/:id/cancel
#[derive(Debug, Deserialize)]
pub struct CancelOrderRequest {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(flatten)]
    pub operator: OperatorInfo,
}

pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CancelOrderRequest>,
) -> AppResult<Json<CommandResponse>> {
    validate_optional_text(&payload.reason, "reason", MAX_NOTE_LEN)?;
    let cmd = payload.operator.command(OrderCommandPayload::CancelOrder {
        order_id: id,
        reason: payload.reason,
    });
    into_response(state.orders.execute_command(cmd))
}

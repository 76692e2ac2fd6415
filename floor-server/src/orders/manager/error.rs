use super::super::storage::StorageError;
use super::super::traits::OrderError;
use shared::error::{AppError, ErrorCode};
use shared::order::types::{CommandError, CommandErrorCode};
use shared::order::BlockedOrder;
use thiserror::Error;

/// Manager errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order already completed: {0}")]
    OrderAlreadyCompleted(String),

    #[error("Order already cancelled: {0}")]
    OrderAlreadyCancelled(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Table unavailable: {0}")]
    TableUnavailable(String),

    #[error("Order has no items")]
    EmptyOrder,

    #[error("No open orders for table {0}")]
    NoOpenOrders(String),

    #[error("Closure blocked: {} order(s) not fully prepared", .0.len())]
    ClosureBlocked(Vec<BlockedOrder>),

    #[error("Inconsistent order state: {0:?}")]
    InconsistentState(Vec<String>),

    #[error("{1}")]
    InvalidOperation(CommandErrorCode, String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Map a storage failure to its machine-readable code. redb reports
/// environment failures (disk, memory, corruption) only through its
/// error display; classify by message, defaulting to SystemBusy.
fn classify_storage_error(e: &StorageError) -> CommandErrorCode {
    if let StorageError::Serialization(_) = e {
        return CommandErrorCode::InternalError;
    }

    let err_str = e.to_string().to_lowercase();

    if err_str.contains("no space") || err_str.contains("disk full") || err_str.contains("enospc") {
        return CommandErrorCode::StorageFull;
    }
    if err_str.contains("out of memory") || err_str.contains("cannot allocate") {
        return CommandErrorCode::OutOfMemory;
    }
    if err_str.contains("corrupt") || err_str.contains("invalid database") {
        return CommandErrorCode::StorageCorrupted;
    }

    CommandErrorCode::SystemBusy
}

impl From<ManagerError> for CommandError {
    fn from(err: ManagerError) -> Self {
        let (code, message) = match err {
            ManagerError::Storage(e) => {
                let code = classify_storage_error(&e);
                let message = e.to_string();
                tracing::error!(error = %e, error_code = ?code, "Storage error occurred");
                (code, message)
            }
            ManagerError::OrderNotFound(id) => (
                CommandErrorCode::OrderNotFound,
                format!("Order not found: {}", id),
            ),
            ManagerError::OrderAlreadyCompleted(id) => (
                CommandErrorCode::OrderAlreadyCompleted,
                format!("Order already completed: {}", id),
            ),
            ManagerError::OrderAlreadyCancelled(id) => (
                CommandErrorCode::OrderAlreadyCancelled,
                format!("Order already cancelled: {}", id),
            ),
            ManagerError::TableNotFound(table) => (
                CommandErrorCode::TableNotFound,
                format!("Table not found: {}", table),
            ),
            ManagerError::TableUnavailable(table) => (
                CommandErrorCode::TableUnavailable,
                format!("Table unavailable: {}", table),
            ),
            ManagerError::EmptyOrder => (
                CommandErrorCode::EmptyOrder,
                "Order has no items".to_string(),
            ),
            ManagerError::NoOpenOrders(table) => (
                CommandErrorCode::NoOpenOrders,
                format!("No open orders for table {}", table),
            ),
            ManagerError::ClosureBlocked(blocked) => {
                let detail = blocked
                    .iter()
                    .map(|b| {
                        format!(
                            "{} ({})",
                            b.order_id,
                            b.pending_kitchens
                                .iter()
                                .map(|k| k.name())
                                .collect::<Vec<_>>()
                                .join(", ")
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("; ");
                (
                    CommandErrorCode::ClosureBlocked,
                    format!("Closure blocked by kitchen readiness: {}", detail),
                )
            }
            ManagerError::InconsistentState(ids) => (
                CommandErrorCode::InconsistentState,
                format!("Inconsistent order state: {:?}", ids),
            ),
            ManagerError::InvalidOperation(code, msg) => (code, msg),
            ManagerError::Internal(msg) => (CommandErrorCode::InternalError, msg),
        };
        CommandError::new(code, message)
    }
}

impl From<OrderError> for ManagerError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::OrderNotFound(id) => ManagerError::OrderNotFound(id),
            OrderError::OrderAlreadyCompleted(id) => ManagerError::OrderAlreadyCompleted(id),
            OrderError::OrderAlreadyCancelled(id) => ManagerError::OrderAlreadyCancelled(id),
            OrderError::TableNotFound(table) => ManagerError::TableNotFound(table),
            OrderError::TableUnavailable(table) => ManagerError::TableUnavailable(table),
            OrderError::EmptyOrder => ManagerError::EmptyOrder,
            OrderError::NoOpenOrders(table) => ManagerError::NoOpenOrders(table),
            OrderError::ClosureBlocked(blocked) => ManagerError::ClosureBlocked(blocked),
            OrderError::InconsistentState(ids) => ManagerError::InconsistentState(ids),
            OrderError::InvalidOperation(code, msg) => ManagerError::InvalidOperation(code, msg),
            OrderError::Storage(e) => ManagerError::Storage(e),
        }
    }
}

impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        match err {
            ManagerError::Storage(ref e) => {
                let code = match classify_storage_error(e) {
                    CommandErrorCode::StorageFull => ErrorCode::StorageFull,
                    CommandErrorCode::OutOfMemory => ErrorCode::OutOfMemory,
                    CommandErrorCode::StorageCorrupted => ErrorCode::StorageCorrupted,
                    CommandErrorCode::InternalError => ErrorCode::InternalError,
                    _ => ErrorCode::SystemBusy,
                };
                tracing::error!(error = %e, error_code = %code, "Storage error occurred");
                AppError::with_message(code, err.to_string())
            }
            ManagerError::OrderNotFound(ref id) => {
                AppError::with_message(ErrorCode::OrderNotFound, err.to_string())
                    .with_detail("order_id", id.clone())
            }
            ManagerError::OrderAlreadyCompleted(_) => {
                AppError::with_message(ErrorCode::OrderAlreadyCompleted, err.to_string())
            }
            ManagerError::OrderAlreadyCancelled(_) => {
                AppError::with_message(ErrorCode::OrderAlreadyCancelled, err.to_string())
            }
            ManagerError::TableNotFound(ref table) => {
                AppError::with_message(ErrorCode::TableNotFound, err.to_string())
                    .with_detail("table_number", table.clone())
            }
            ManagerError::TableUnavailable(_) => {
                AppError::with_message(ErrorCode::ValidationFailed, err.to_string())
            }
            ManagerError::EmptyOrder => {
                AppError::with_message(ErrorCode::OrderEmpty, err.to_string())
            }
            ManagerError::NoOpenOrders(ref table) => {
                AppError::with_message(ErrorCode::NoOpenOrders, err.to_string())
                    .with_detail("table_number", table.clone())
            }
            ManagerError::ClosureBlocked(ref blocked) => {
                let detail = serde_json::to_value(blocked).unwrap_or_default();
                AppError::with_message(ErrorCode::ClosureBlocked, err.to_string())
                    .with_detail("blocked_orders", detail)
            }
            ManagerError::InconsistentState(ref ids) => {
                AppError::with_message(ErrorCode::InconsistentOrderState, err.to_string())
                    .with_detail("order_ids", serde_json::to_value(ids).unwrap_or_default())
            }
            ManagerError::InvalidOperation(code, msg) => {
                let app_code = match code {
                    CommandErrorCode::InvalidQuantity => ErrorCode::InvalidQuantity,
                    CommandErrorCode::InvalidAmount => ErrorCode::InvalidAmount,
                    _ => ErrorCode::ValidationFailed,
                };
                AppError::with_message(app_code, msg)
            }
            ManagerError::Internal(msg) => AppError::internal(msg),
        }
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::KitchenStation;

    #[test]
    fn test_closure_blocked_command_error_names_kitchens() {
        let err = ManagerError::ClosureBlocked(vec![BlockedOrder {
            order_id: "ord-1".to_string(),
            pending_kitchens: vec![KitchenStation::Beverage],
        }]);
        let cmd: CommandError = err.into();
        assert_eq!(cmd.code, CommandErrorCode::ClosureBlocked);
        assert!(cmd.message.contains("ord-1"));
        assert!(cmd.message.contains("beverage"));
    }

    #[test]
    fn test_closure_blocked_app_error_carries_detail() {
        let err = ManagerError::ClosureBlocked(vec![BlockedOrder {
            order_id: "ord-1".to_string(),
            pending_kitchens: vec![KitchenStation::Food],
        }]);
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::ClosureBlocked);
        assert!(app.details.unwrap().contains_key("blocked_orders"));
    }

    #[test]
    fn test_invalid_operation_preserves_code() {
        let err = ManagerError::InvalidOperation(
            CommandErrorCode::InvalidQuantity,
            "quantity must be positive".to_string(),
        );
        let cmd: CommandError = err.into();
        assert_eq!(cmd.code, CommandErrorCode::InvalidQuantity);
    }
}

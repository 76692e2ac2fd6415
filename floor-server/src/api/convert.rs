//! Conversion from command-layer errors to HTTP error responses

use shared::error::{AppError, ErrorCode};
use shared::order::types::{CommandError, CommandErrorCode};

/// Map a rejected command to the HTTP error it should surface as.
///
/// Every `CommandErrorCode` has a stable `ErrorCode` counterpart; codes
/// without a dedicated HTTP-side number fall back to ValidationFailed.
pub fn command_error_to_app(err: CommandError) -> AppError {
    let code = match err.code {
        CommandErrorCode::OrderNotFound => ErrorCode::OrderNotFound,
        CommandErrorCode::OrderAlreadyCompleted => ErrorCode::OrderAlreadyCompleted,
        CommandErrorCode::OrderAlreadyCancelled => ErrorCode::OrderAlreadyCancelled,
        CommandErrorCode::ItemNotFound => ErrorCode::ItemNotFound,
        CommandErrorCode::TableNotFound => ErrorCode::TableNotFound,
        CommandErrorCode::EmptyOrder => ErrorCode::OrderEmpty,
        CommandErrorCode::InvalidQuantity => ErrorCode::InvalidQuantity,
        CommandErrorCode::InvalidAmount => ErrorCode::InvalidAmount,
        CommandErrorCode::DuplicateCommand => ErrorCode::DuplicateCommand,
        CommandErrorCode::NoOpenOrders => ErrorCode::NoOpenOrders,
        CommandErrorCode::ClosureBlocked => ErrorCode::ClosureBlocked,
        CommandErrorCode::ConfirmationRequired => ErrorCode::ClosureConfirmationRequired,
        CommandErrorCode::InconsistentState => ErrorCode::InconsistentOrderState,
        CommandErrorCode::InternalError => ErrorCode::InternalError,
        CommandErrorCode::StorageFull => ErrorCode::StorageFull,
        CommandErrorCode::OutOfMemory => ErrorCode::OutOfMemory,
        CommandErrorCode::StorageCorrupted => ErrorCode::StorageCorrupted,
        CommandErrorCode::SystemBusy => ErrorCode::SystemBusy,
        CommandErrorCode::TableUnavailable
        | CommandErrorCode::InvalidKitchen
        | CommandErrorCode::InvalidOperation => ErrorCode::ValidationFailed,
    };
    AppError::with_message(code, err.message)
}

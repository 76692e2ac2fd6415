//! Unified error codes for the floor server
//!
//! This module defines all error codes used across the server and its clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Catalog errors
//! - 7xxx: Table and session errors
//! - 8xxx: Table closure errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been completed
    OrderAlreadyCompleted = 4002,
    /// Order has already been cancelled
    OrderAlreadyCancelled = 4003,
    /// Order is empty
    OrderEmpty = 4004,
    /// Order is not ready for the requested transition
    OrderNotReady = 4005,
    /// Invalid item quantity
    InvalidQuantity = 4006,
    /// Invalid monetary amount
    InvalidAmount = 4007,
    /// Duplicate command (already processed)
    DuplicateCommand = 4008,

    // ==================== 5xxx: Payment ====================
    /// Invalid payment method
    PaymentInvalidMethod = 5001,
    /// Payment has already been confirmed
    PaymentAlreadyConfirmed = 5002,
    /// Payment confirmation is required before this operation
    PaymentRequired = 5003,

    // ==================== 6xxx: Catalog ====================
    /// Catalog item not found
    ItemNotFound = 6001,
    /// Catalog item is not available for ordering
    ItemUnavailable = 6002,
    /// Addon not found on the catalog item
    AddonNotFound = 6101,

    // ==================== 7xxx: Table and Session ====================
    /// Table not found
    TableNotFound = 7001,
    /// Session not found
    SessionNotFound = 7101,
    /// Session has already ended
    SessionEnded = 7102,
    /// Session join window has closed
    SessionJoinWindowClosed = 7103,
    /// Session exceeded its maximum lifetime
    SessionExpired = 7104,

    // ==================== 8xxx: Table Closure ====================
    /// Table has no open orders to close
    NoOpenOrders = 8001,
    /// Closure blocked by kitchen readiness
    ClosureBlocked = 8002,
    /// Closure needs explicit confirmation for in-flight orders
    ClosureConfirmationRequired = 8003,
    /// Open-order index disagrees with stored order state
    InconsistentOrderState = 8004,
    /// Consolidation transaction failed
    ConsolidationFailed = 8005,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,

    // ==================== 94xx: Storage ====================
    /// Storage full (disk space insufficient)
    StorageFull = 9401,
    /// Out of memory
    OutOfMemory = 9402,
    /// Storage corrupted (data file damaged)
    StorageCorrupted = 9403,
    /// System busy (IO error, retry later)
    SystemBusy = 9404,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyCompleted => "Order has already been completed",
            ErrorCode::OrderAlreadyCancelled => "Order has already been cancelled",
            ErrorCode::OrderEmpty => "Order has no items",
            ErrorCode::OrderNotReady => "Order is not ready for this operation",
            ErrorCode::InvalidQuantity => "Invalid item quantity",
            ErrorCode::InvalidAmount => "Invalid monetary amount",
            ErrorCode::DuplicateCommand => "Command has already been processed",

            // Payment
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",
            ErrorCode::PaymentAlreadyConfirmed => "Payment has already been confirmed",
            ErrorCode::PaymentRequired => "Payment confirmation is required",

            // Catalog
            ErrorCode::ItemNotFound => "Catalog item not found",
            ErrorCode::ItemUnavailable => "Catalog item is not available",
            ErrorCode::AddonNotFound => "Addon not found on catalog item",

            // Table and session
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::SessionNotFound => "Session not found",
            ErrorCode::SessionEnded => "Session has already ended",
            ErrorCode::SessionJoinWindowClosed => "Session join window has closed",
            ErrorCode::SessionExpired => "Session exceeded its maximum lifetime",

            // Closure
            ErrorCode::NoOpenOrders => "Table has no open orders",
            ErrorCode::ClosureBlocked => "Closure blocked by kitchen readiness",
            ErrorCode::ClosureConfirmationRequired => {
                "Closure needs confirmation for in-flight orders"
            }
            ErrorCode::InconsistentOrderState => "Order index is inconsistent with stored state",
            ErrorCode::ConsolidationFailed => "Order consolidation failed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error occurred",
            ErrorCode::NetworkError => "Network error occurred",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",

            // Storage
            ErrorCode::StorageFull => "Storage is full, cannot save data",
            ErrorCode::OutOfMemory => "Out of memory",
            ErrorCode::StorageCorrupted => "Storage is corrupted",
            ErrorCode::SystemBusy => "System is busy, please retry",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

/// Error returned when converting an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderAlreadyCompleted),
            4003 => Ok(ErrorCode::OrderAlreadyCancelled),
            4004 => Ok(ErrorCode::OrderEmpty),
            4005 => Ok(ErrorCode::OrderNotReady),
            4006 => Ok(ErrorCode::InvalidQuantity),
            4007 => Ok(ErrorCode::InvalidAmount),
            4008 => Ok(ErrorCode::DuplicateCommand),

            // Payment
            5001 => Ok(ErrorCode::PaymentInvalidMethod),
            5002 => Ok(ErrorCode::PaymentAlreadyConfirmed),
            5003 => Ok(ErrorCode::PaymentRequired),

            // Catalog
            6001 => Ok(ErrorCode::ItemNotFound),
            6002 => Ok(ErrorCode::ItemUnavailable),
            6101 => Ok(ErrorCode::AddonNotFound),

            // Table and session
            7001 => Ok(ErrorCode::TableNotFound),
            7101 => Ok(ErrorCode::SessionNotFound),
            7102 => Ok(ErrorCode::SessionEnded),
            7103 => Ok(ErrorCode::SessionJoinWindowClosed),
            7104 => Ok(ErrorCode::SessionExpired),

            // Closure
            8001 => Ok(ErrorCode::NoOpenOrders),
            8002 => Ok(ErrorCode::ClosureBlocked),
            8003 => Ok(ErrorCode::ClosureConfirmationRequired),
            8004 => Ok(ErrorCode::InconsistentOrderState),
            8005 => Ok(ErrorCode::ConsolidationFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            // Storage
            9401 => Ok(ErrorCode::StorageFull),
            9402 => Ok(ErrorCode::OutOfMemory),
            9403 => Ok(ErrorCode::StorageCorrupted),
            9404 => Ok(ErrorCode::SystemBusy),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        // General
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::Unknown.code(), 1);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::AlreadyExists.code(), 4);
        assert_eq!(ErrorCode::InvalidRequest.code(), 5);

        // Order
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::OrderAlreadyCompleted.code(), 4002);
        assert_eq!(ErrorCode::OrderAlreadyCancelled.code(), 4003);
        assert_eq!(ErrorCode::OrderEmpty.code(), 4004);
        assert_eq!(ErrorCode::OrderNotReady.code(), 4005);
        assert_eq!(ErrorCode::InvalidQuantity.code(), 4006);
        assert_eq!(ErrorCode::InvalidAmount.code(), 4007);
        assert_eq!(ErrorCode::DuplicateCommand.code(), 4008);

        // Payment
        assert_eq!(ErrorCode::PaymentInvalidMethod.code(), 5001);
        assert_eq!(ErrorCode::PaymentAlreadyConfirmed.code(), 5002);
        assert_eq!(ErrorCode::PaymentRequired.code(), 5003);

        // Catalog
        assert_eq!(ErrorCode::ItemNotFound.code(), 6001);
        assert_eq!(ErrorCode::ItemUnavailable.code(), 6002);
        assert_eq!(ErrorCode::AddonNotFound.code(), 6101);

        // Table and session
        assert_eq!(ErrorCode::TableNotFound.code(), 7001);
        assert_eq!(ErrorCode::SessionNotFound.code(), 7101);
        assert_eq!(ErrorCode::SessionEnded.code(), 7102);
        assert_eq!(ErrorCode::SessionJoinWindowClosed.code(), 7103);
        assert_eq!(ErrorCode::SessionExpired.code(), 7104);

        // Closure
        assert_eq!(ErrorCode::NoOpenOrders.code(), 8001);
        assert_eq!(ErrorCode::ClosureBlocked.code(), 8002);
        assert_eq!(ErrorCode::ClosureConfirmationRequired.code(), 8003);
        assert_eq!(ErrorCode::InconsistentOrderState.code(), 8004);
        assert_eq!(ErrorCode::ConsolidationFailed.code(), 8005);

        // System
        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
        assert_eq!(ErrorCode::NetworkError.code(), 9003);
        assert_eq!(ErrorCode::TimeoutError.code(), 9004);
        assert_eq!(ErrorCode::ConfigError.code(), 9005);

        // Storage
        assert_eq!(ErrorCode::StorageFull.code(), 9401);
        assert_eq!(ErrorCode::OutOfMemory.code(), 9402);
        assert_eq!(ErrorCode::StorageCorrupted.code(), 9403);
        assert_eq!(ErrorCode::SystemBusy.code(), 9404);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::OrderNotFound.is_success());
        assert!(!ErrorCode::InternalError.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(4001), Ok(ErrorCode::OrderNotFound));
        assert_eq!(ErrorCode::try_from(8002), Ok(ErrorCode::ClosureBlocked));
        assert_eq!(ErrorCode::try_from(9401), Ok(ErrorCode::StorageFull));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(12345), Err(InvalidErrorCode(12345)));
        assert_eq!(ErrorCode::try_from(65535), Err(InvalidErrorCode(65535)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::NotFound).unwrap();
        assert_eq!(json, "3");

        let json = serde_json::to_string(&ErrorCode::OrderNotFound).unwrap();
        assert_eq!(json, "4001");

        let json = serde_json::to_string(&ErrorCode::ClosureConfirmationRequired).unwrap();
        assert_eq!(json, "8003");
    }

    #[test]
    fn test_deserialize_from_number() {
        let code: ErrorCode = serde_json::from_str("3").unwrap();
        assert_eq!(code, ErrorCode::NotFound);

        let code: ErrorCode = serde_json::from_str("8001").unwrap();
        assert_eq!(code, ErrorCode::NoOpenOrders);
    }

    #[test]
    fn test_deserialize_invalid_number() {
        let result: Result<ErrorCode, _> = serde_json::from_str("1234");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::Success.to_string(), "0");
        assert_eq!(ErrorCode::OrderNotFound.to_string(), "4001");
        assert_eq!(ErrorCode::SystemBusy.to_string(), "9404");
    }

    #[test]
    fn test_message_not_empty() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::OrderNotFound,
            ErrorCode::PaymentInvalidMethod,
            ErrorCode::ItemNotFound,
            ErrorCode::TableNotFound,
            ErrorCode::SessionJoinWindowClosed,
            ErrorCode::NoOpenOrders,
            ErrorCode::ClosureBlocked,
            ErrorCode::InconsistentOrderState,
            ErrorCode::StorageCorrupted,
        ];
        for code in codes {
            assert!(!code.message().is_empty());
        }
    }

    #[test]
    fn test_roundtrip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::NotFound,
            ErrorCode::OrderNotFound,
            ErrorCode::OrderAlreadyCompleted,
            ErrorCode::PaymentRequired,
            ErrorCode::AddonNotFound,
            ErrorCode::SessionExpired,
            ErrorCode::ClosureConfirmationRequired,
            ErrorCode::ConsolidationFailed,
            ErrorCode::SystemBusy,
        ];
        for code in codes {
            let value: u16 = code.into();
            let back = ErrorCode::try_from(value).unwrap();
            assert_eq!(code, back);
        }
    }

    #[test]
    fn test_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(ErrorCode::Success);
        set.insert(ErrorCode::OrderNotFound);
        set.insert(ErrorCode::OrderNotFound);
        assert_eq!(set.len(), 2);
        assert!(set.contains(&ErrorCode::OrderNotFound));
    }
}

//! Shared types for the floor server and its clients.
//!
//! Common types used across the workspace: unified error codes, the HTTP
//! response envelope, dining-room models and the order command/event types.

pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};

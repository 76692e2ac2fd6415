//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits are chosen based on:
//! - 80mm receipt line width: 48 chars
//! - Reasonable UX limits for names and notes

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Table numbers and other short identifiers
pub const MAX_TABLE_NUMBER_LEN: usize = 32;

/// Entity names: product, table, operator, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes and reasons (item note, cancel reason, system note)
pub const MAX_NOTE_LEN: usize = 500;

// ── Validation helpers (HTTP handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

// ── Validation helpers (Order actions) ──────────────────────────────

use crate::orders::traits::OrderError;
use shared::order::types::CommandErrorCode;

/// Validate a required string for order actions (max length).
pub fn validate_order_text(value: &str, field: &str, max_len: usize) -> Result<(), OrderError> {
    if value.len() > max_len {
        return Err(OrderError::InvalidOperation(
            CommandErrorCode::InvalidOperation,
            format!("{field} is too long ({} chars, max {max_len})", value.len()),
        ));
    }
    Ok(())
}

/// Validate an optional string for order actions (max length).
pub fn validate_order_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), OrderError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(OrderError::InvalidOperation(
            CommandErrorCode::InvalidOperation,
            format!("{field} is too long ({} chars, max {max_len})", v.len()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_rejects_empty() {
        assert!(validate_required_text("  ", "table_number", MAX_TABLE_NUMBER_LEN).is_err());
        assert!(validate_required_text("12", "table_number", MAX_TABLE_NUMBER_LEN).is_ok());
    }

    #[test]
    fn test_required_text_rejects_too_long() {
        let long = "x".repeat(MAX_TABLE_NUMBER_LEN + 1);
        assert!(validate_required_text(&long, "table_number", MAX_TABLE_NUMBER_LEN).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "note", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("ok".to_string()), "note", MAX_NOTE_LEN).is_ok());
        let long = Some("x".repeat(MAX_NOTE_LEN + 1));
        assert!(validate_optional_text(&long, "note", MAX_NOTE_LEN).is_err());
    }
}

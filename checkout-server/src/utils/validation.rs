//! Input validation helpers
//!
//! Centralized length/quantity limits and validation functions for
//! the request boundary. Checkout-internal money validation lives in
//! `checkout::money`.

use crate::utils::AppError;

// ── Limits ──────────────────────────────────────────────────────────

/// Entity names: product entries, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Short identifiers: session ids, coupon ids, card numbers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Maximum quantity per cart line
pub const MAX_QUANTITY: i32 = 9999;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the
/// length limit.
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

/// Validate that a quantity is positive and within bounds.
pub fn validate_quantity(quantity: i32) -> Result<(), AppError> {
    if quantity <= 0 {
        return Err(AppError::validation(format!(
            "quantity must be positive, got {quantity}"
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {quantity}"
        )));
    }
    Ok(())
}

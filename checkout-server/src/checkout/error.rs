//! Checkout workflow errors

use crate::checkout::storage::StorageError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Errors produced by the checkout workflow
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("No purchasable items in cart")]
    EmptyCart,

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Cart line not found: {0}")]
    CartLineNotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Coupon unavailable: {0}")]
    CouponUnavailable(String),

    #[error("Payment declined: {0}")]
    PaymentDeclined(String),

    #[error("Unsupported payment method: {0}")]
    UnsupportedPaymentMethod(String),

    #[error("Invalid status transition: {0}")]
    InvalidStatus(String),

    #[error("Order is finalized: {0}")]
    OrderFinalized(String),

    #[error("Checkout deadline exceeded")]
    DeadlineExceeded,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::SessionNotFound(id) => {
                AppError::new(ErrorCode::SessionNotFound).with_detail("session_id", id)
            }
            CheckoutError::OrderNotFound(id) => {
                AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", id)
            }
            CheckoutError::EmptyCart => AppError::empty_cart(),
            CheckoutError::ProductNotFound(id) => {
                AppError::new(ErrorCode::ProductNotFound).with_detail("product_entry_id", id)
            }
            CheckoutError::CartLineNotFound(id) => {
                AppError::new(ErrorCode::CartLineNotFound).with_detail("line_id", id)
            }
            CheckoutError::Validation(msg) => AppError::validation(msg),
            CheckoutError::CouponUnavailable(msg) => {
                AppError::with_message(ErrorCode::CouponUnavailable, msg)
            }
            CheckoutError::PaymentDeclined(msg) => AppError::payment_declined(msg),
            CheckoutError::UnsupportedPaymentMethod(method) => {
                AppError::unsupported_payment_method(method)
            }
            CheckoutError::InvalidStatus(msg) => AppError::invalid_status(msg),
            CheckoutError::OrderFinalized(id) => {
                AppError::new(ErrorCode::OrderFinalized).with_detail("order_id", id)
            }
            CheckoutError::DeadlineExceeded => {
                AppError::new(ErrorCode::CheckoutDeadlineExceeded)
            }
            CheckoutError::Storage(err) => {
                // Internals stay in the log; the caller only gets a
                // correlation id
                let correlation_id = shared::util::new_id();
                tracing::error!(%correlation_id, error = %err, "storage failure");
                AppError::opaque_internal(correlation_id)
            }
        }
    }
}

pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let app: AppError = CheckoutError::EmptyCart.into();
        assert_eq!(app.code, ErrorCode::EmptyCart);

        let app: AppError = CheckoutError::PaymentDeclined("bad cvv".into()).into();
        assert_eq!(app.code, ErrorCode::PaymentDeclined);

        let app: AppError = CheckoutError::DeadlineExceeded.into();
        assert_eq!(app.code, ErrorCode::CheckoutDeadlineExceeded);
    }
}

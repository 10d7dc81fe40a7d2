//! Unified error codes for the checkout service
//!
//! This module defines all error codes used by the server and its
//! clients. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Session/identity errors
//! - 4xxx: Order/checkout errors
//! - 5xxx: Payment errors
//! - 6xxx: Coupon errors
//! - 7xxx: Catalog/cart errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient
/// serialization and cross-language compatibility (Rust, TypeScript).
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
    /// Required field missing
    RequiredField = 6,

    // ==================== 1xxx: Session ====================
    /// Shopping session not found
    SessionNotFound = 1001,
    /// User not found for session
    UserNotFound = 1002,

    // ==================== 4xxx: Order / Checkout ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Cart has no purchasable lines
    EmptyCart = 4002,
    /// Status value is not in the allow-list or the transition is rejected
    InvalidStatus = 4003,
    /// Order is in a terminal state and cannot change
    OrderFinalized = 4004,
    /// Checkout deadline exceeded
    CheckoutDeadlineExceeded = 4005,

    // ==================== 5xxx: Payment ====================
    /// Payment was declined by the method handler
    PaymentDeclined = 5001,
    /// Unknown payment method
    UnsupportedPaymentMethod = 5002,
    /// Payment amount invalid
    InvalidAmount = 5003,
    /// Payment not found
    PaymentNotFound = 5004,

    // ==================== 6xxx: Coupon ====================
    /// No active in-window coupon for the user
    CouponUnavailable = 6001,
    /// Coupon already consumed
    CouponConsumed = 6002,

    // ==================== 7xxx: Catalog / Cart ====================
    /// Product entry not found in catalog
    ProductNotFound = 7001,
    /// Cart line not found
    CartLineNotFound = 7002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
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
            ErrorCode::RequiredField => "Required field is missing",

            // Session
            ErrorCode::SessionNotFound => "Shopping session not found",
            ErrorCode::UserNotFound => "User not found",

            // Order / Checkout
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::EmptyCart => "Cart has no purchasable lines",
            ErrorCode::InvalidStatus => "Order status is not allowed",
            ErrorCode::OrderFinalized => "Order is in a terminal state",
            ErrorCode::CheckoutDeadlineExceeded => "Checkout deadline exceeded",

            // Payment
            ErrorCode::PaymentDeclined => "Payment was declined",
            ErrorCode::UnsupportedPaymentMethod => "Unsupported payment method",
            ErrorCode::InvalidAmount => "Payment amount is invalid",
            ErrorCode::PaymentNotFound => "Payment not found",

            // Coupon
            ErrorCode::CouponUnavailable => "No active coupon available",
            ErrorCode::CouponConsumed => "Coupon has already been consumed",

            // Catalog / Cart
            ErrorCode::ProductNotFound => "Product entry not found",
            ErrorCode::CartLineNotFound => "Cart line not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }

    /// Get the category for this error code
    pub fn category(&self) -> super::ErrorCategory {
        super::ErrorCategory::from_code(self.code())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
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
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            6 => Self::RequiredField,
            1001 => Self::SessionNotFound,
            1002 => Self::UserNotFound,
            4001 => Self::OrderNotFound,
            4002 => Self::EmptyCart,
            4003 => Self::InvalidStatus,
            4004 => Self::OrderFinalized,
            4005 => Self::CheckoutDeadlineExceeded,
            5001 => Self::PaymentDeclined,
            5002 => Self::UnsupportedPaymentMethod,
            5003 => Self::InvalidAmount,
            5004 => Self::PaymentNotFound,
            6001 => Self::CouponUnavailable,
            6002 => Self::CouponConsumed,
            7001 => Self::ProductNotFound,
            7002 => Self::CartLineNotFound,
            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            9004 => Self::TimeoutError,
            9005 => Self::ConfigError,
            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

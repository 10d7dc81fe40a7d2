//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::SessionNotFound
            | Self::UserNotFound
            | Self::OrderNotFound
            | Self::PaymentNotFound
            | Self::ProductNotFound
            | Self::CartLineNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists | Self::OrderFinalized | Self::CouponConsumed => {
                StatusCode::CONFLICT
            }

            // 422 Unprocessable Entity (business rule rejections)
            Self::EmptyCart
            | Self::InvalidStatus
            | Self::PaymentDeclined
            | Self::UnsupportedPaymentMethod
            | Self::InvalidAmount
            | Self::CouponUnavailable => StatusCode::UNPROCESSABLE_ENTITY,

            // 400 Bad Request
            Self::ValidationFailed | Self::InvalidRequest | Self::RequiredField => {
                StatusCode::BAD_REQUEST
            }

            // 504 Gateway Timeout
            Self::CheckoutDeadlineExceeded | Self::TimeoutError => StatusCode::GATEWAY_TIMEOUT,

            // 500 Internal Server Error
            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

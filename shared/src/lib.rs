//! Shared types for the checkout service
//!
//! Common types used by the server and its clients: error codes and
//! the unified API response envelope, checkout domain types (cart
//! lines, orders, payments, coupons) and their request/response DTOs,
//! plus small time utilities.

pub mod checkout;
pub mod error;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

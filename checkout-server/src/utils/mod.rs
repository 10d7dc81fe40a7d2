//! Utility modules

pub mod logger;
pub mod validation;

// Unified error types come from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

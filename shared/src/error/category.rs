//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Session/identity errors
/// - 4xxx: Order/checkout errors
/// - 5xxx: Payment errors
/// - 6xxx: Coupon errors
/// - 7xxx: Catalog/cart errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Session/identity errors (1xxx)
    Session,
    /// Order/checkout errors (4xxx)
    Order,
    /// Payment errors (5xxx)
    Payment,
    /// Coupon errors (6xxx)
    Coupon,
    /// Catalog/cart errors (7xxx)
    Catalog,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Session,
            4000..5000 => Self::Order,
            5000..6000 => Self::Payment,
            6000..7000 => Self::Coupon,
            7000..8000 => Self::Catalog,
            _ => Self::System,
        }
    }

    /// Whether errors of this category are caused by the caller
    /// (as opposed to server-side failures).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::System)
    }
}

impl From<ErrorCode> for ErrorCategory {
    fn from(code: ErrorCode) -> Self {
        Self::from_code(code.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(2), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Session);
        assert_eq!(ErrorCategory::from_code(4002), ErrorCategory::Order);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Payment);
        assert_eq!(ErrorCategory::from_code(6001), ErrorCategory::Coupon);
        assert_eq!(ErrorCategory::from_code(7001), ErrorCategory::Catalog);
        assert_eq!(ErrorCategory::from_code(9002), ErrorCategory::System);
    }

    #[test]
    fn test_system_is_not_client_error() {
        assert!(!ErrorCategory::System.is_client_error());
        assert!(ErrorCategory::Order.is_client_error());
    }
}

//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic is done using `Decimal` internally, then converted
//! to `f64` for storage/serialization. Monetary values are rounded to
//! 2 decimal places, half-up.

use crate::checkout::error::CheckoutError;
use rust_decimal::prelude::*;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed unit price (€1,000,000)
pub const MAX_PRICE: f64 = 1_000_000.0;

/// Convert f64 to Decimal for computation
///
/// Falls back to zero for non-finite input; callers validate
/// finiteness at the boundary.
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Convert Decimal back to f64 for storage, rounded half-up to 2dp
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), CheckoutError> {
    if !value.is_finite() {
        return Err(CheckoutError::Validation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Validate a unit price before it enters a cart line
pub fn validate_unit_price(price: f64) -> Result<(), CheckoutError> {
    require_finite(price, "unit_price")?;
    if price < 0.0 {
        return Err(CheckoutError::Validation(format!(
            "unit_price must be non-negative, got {}",
            price
        )));
    }
    if price > MAX_PRICE {
        return Err(CheckoutError::Validation(format!(
            "unit_price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, price
        )));
    }
    Ok(())
}

/// Validate a coupon discount amount
pub fn validate_discount(discount: f64) -> Result<(), CheckoutError> {
    require_finite(discount, "discount_amount")?;
    if discount < 0.0 {
        return Err(CheckoutError::Validation(format!(
            "discount_amount must be non-negative, got {}",
            discount
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_rounds_half_up() {
        assert_eq!(to_f64(to_decimal(10.005)), 10.01);
        assert_eq!(to_f64(to_decimal(10.004)), 10.0);
        assert_eq!(to_f64(to_decimal(0.1) + to_decimal(0.2)), 0.3);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(validate_unit_price(f64::NAN).is_err());
        assert!(validate_unit_price(f64::INFINITY).is_err());
        assert!(validate_unit_price(-1.0).is_err());
        assert!(validate_unit_price(MAX_PRICE + 1.0).is_err());
        assert!(validate_unit_price(9.99).is_ok());
    }

    #[test]
    fn test_discount_bounds() {
        assert!(validate_discount(0.0).is_ok());
        assert!(validate_discount(5.0).is_ok());
        assert!(validate_discount(-0.01).is_err());
        assert!(validate_discount(f64::NAN).is_err());
    }
}

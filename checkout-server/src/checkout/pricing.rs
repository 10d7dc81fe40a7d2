//! Order total calculation
//!
//! Totals are computed from the price snapshot captured in the cart
//! lines, never re-read from the catalog, so repeated checkouts of
//! the same cart produce identical totals.

use crate::checkout::money::to_decimal;
use rust_decimal::Decimal;
use shared::checkout::CartLine;

/// Sum of quantity × unit_price over the given lines
pub fn subtotal(lines: &[CartLine]) -> Decimal {
    lines
        .iter()
        .map(|line| to_decimal(line.unit_price) * Decimal::from(line.quantity))
        .sum()
}

/// Apply a discount, clamping the result at zero
///
/// A discount larger than the subtotal yields a free order, never a
/// negative total.
pub fn apply_discount(subtotal: Decimal, discount: Decimal) -> Decimal {
    (subtotal - discount).max(Decimal::ZERO)
}

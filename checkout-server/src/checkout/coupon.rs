//! Coupon resolution
//!
//! Selection of the single applicable coupon assignment for a user at
//! checkout time. Consumption itself happens in the storage layer,
//! inside the checkout write transaction.

use shared::checkout::CouponAssignment;

/// Pick the applicable coupon from a user's assignments.
///
/// A coupon qualifies when it is active and the current time falls
/// inside its validity window. When several qualify the one expiring
/// soonest wins; ties break on coupon_id for determinism.
pub fn resolve_active(coupons: &[CouponAssignment], now: i64) -> Option<&CouponAssignment> {
    coupons
        .iter()
        .filter(|c| c.is_valid_at(now))
        .min_by(|a, b| {
            a.valid_to
                .cmp(&b.valid_to)
                .then_with(|| a.coupon_id.cmp(&b.coupon_id))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coupon(id: &str, active: bool, from: i64, to: i64, discount: f64) -> CouponAssignment {
        CouponAssignment {
            coupon_id: id.to_string(),
            user_id: "u1".to_string(),
            discount_amount: discount,
            is_active: active,
            valid_from: from,
            valid_to: to,
        }
    }

    #[test]
    fn test_none_when_no_valid_coupon() {
        assert!(resolve_active(&[], 100).is_none());
        let coupons = vec![coupon("c1", false, 0, 200, 5.0), coupon("c2", true, 150, 200, 5.0)];
        assert!(resolve_active(&coupons, 100).is_none());
    }

    #[test]
    fn test_expiring_soonest_wins() {
        let coupons = vec![
            coupon("c1", true, 0, 500, 5.0),
            coupon("c2", true, 0, 300, 2.0),
            coupon("c3", true, 0, 800, 9.0),
        ];
        assert_eq!(resolve_active(&coupons, 100).map(|c| c.coupon_id.as_str()), Some("c2"));
    }

    #[test]
    fn test_tie_breaks_on_id() {
        let coupons = vec![coupon("c2", true, 0, 300, 2.0), coupon("c1", true, 0, 300, 5.0)];
        assert_eq!(resolve_active(&coupons, 100).map(|c| c.coupon_id.as_str()), Some("c1"));
    }

    #[test]
    fn test_window_boundaries_inclusive() {
        let coupons = vec![coupon("c1", true, 100, 200, 5.0)];
        assert!(resolve_active(&coupons, 100).is_some());
        assert!(resolve_active(&coupons, 200).is_some());
        assert!(resolve_active(&coupons, 99).is_none());
        assert!(resolve_active(&coupons, 201).is_none());
    }
}

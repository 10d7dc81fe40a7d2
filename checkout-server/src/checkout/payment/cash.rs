//! Cash settlement

use async_trait::async_trait;

use crate::checkout::error::CheckoutResult;
use crate::checkout::payment::{PaymentProcessor, Settlement};
use shared::checkout::{PaymentDetail, PaymentInput, PaymentStatus};

/// Cash settles immediately: money changes hands at the counter, so
/// there is nothing to authorize.
pub struct CashProcessor;

#[async_trait]
impl PaymentProcessor for CashProcessor {
    async fn settle(
        &self,
        payment_id: &str,
        _user_id: &str,
        _amount: f64,
        _input: &PaymentInput,
    ) -> CheckoutResult<Settlement> {
        Ok(Settlement {
            status: PaymentStatus::Completed,
            detail: PaymentDetail::Cash {
                payment_id: payment_id.to_string(),
            },
            stored_card: None,
        })
    }
}

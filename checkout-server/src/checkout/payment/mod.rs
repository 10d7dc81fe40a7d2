//! Payment method strategies
//!
//! Each supported method implements the `PaymentProcessor` trait and
//! handles one way of settling a payment. `PaymentAction` dispatches
//! to the concrete implementations.

use async_trait::async_trait;

use crate::checkout::error::{CheckoutError, CheckoutResult};
use shared::checkout::{PaymentDetail, PaymentInput, PaymentMethod, PaymentStatus, StoredCard};

mod cash;
mod credit_card;

pub use cash::CashProcessor;
pub use credit_card::CreditCardProcessor;

/// Outcome of a settlement attempt
pub struct Settlement {
    /// Resulting payment status (`Completed` on success)
    pub status: PaymentStatus,
    /// Method-specific record to persist alongside the payment
    pub detail: PaymentDetail,
    /// Card to save on the user's profile, when requested
    pub stored_card: Option<StoredCard>,
}

/// One settlement strategy per payment method
#[async_trait]
pub trait PaymentProcessor {
    /// Settle the payment for the given amount.
    ///
    /// A declined settlement is an error (`PaymentDeclined`), never a
    /// `Failed` status in the returned `Settlement`; the orchestrator
    /// owns the failure bookkeeping.
    async fn settle(
        &self,
        payment_id: &str,
        user_id: &str,
        amount: f64,
        input: &PaymentInput,
    ) -> CheckoutResult<Settlement>;
}

/// PaymentAction enum - dispatches to concrete processor implementations
pub enum PaymentAction {
    Cash(CashProcessor),
    CreditCard(CreditCardProcessor),
}

impl PaymentAction {
    /// Select the processor for the requested method string
    pub fn for_input(input: &PaymentInput) -> CheckoutResult<(PaymentMethod, Self)> {
        let method = PaymentMethod::from_input(&input.method)
            .ok_or_else(|| CheckoutError::UnsupportedPaymentMethod(input.method.clone()))?;
        let action = match method {
            PaymentMethod::Cash => PaymentAction::Cash(CashProcessor),
            PaymentMethod::CreditCard => PaymentAction::CreditCard(CreditCardProcessor),
        };
        Ok((method, action))
    }
}

/// Manual implementation of PaymentProcessor for PaymentAction
#[async_trait]
impl PaymentProcessor for PaymentAction {
    async fn settle(
        &self,
        payment_id: &str,
        user_id: &str,
        amount: f64,
        input: &PaymentInput,
    ) -> CheckoutResult<Settlement> {
        match self {
            PaymentAction::Cash(processor) => {
                processor.settle(payment_id, user_id, amount, input).await
            }
            PaymentAction::CreditCard(processor) => {
                processor.settle(payment_id, user_id, amount, input).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(method: &str) -> PaymentInput {
        PaymentInput {
            method: method.to_string(),
            card_number: None,
            cvv: None,
            expiration_date: None,
            save_credit_card: false,
        }
    }

    #[test]
    fn test_method_selection() {
        assert!(matches!(
            PaymentAction::for_input(&input("cash")),
            Ok((PaymentMethod::Cash, PaymentAction::Cash(_)))
        ));
        assert!(matches!(
            PaymentAction::for_input(&input("credit_card")),
            Ok((PaymentMethod::CreditCard, PaymentAction::CreditCard(_)))
        ));
    }

    #[test]
    fn test_unknown_method_rejected() {
        let err = PaymentAction::for_input(&input("crypto")).err();
        assert!(matches!(
            err,
            Some(CheckoutError::UnsupportedPaymentMethod(m)) if m == "crypto"
        ));
    }
}

//! Credit card settlement
//!
//! Card verification happens here, at settle time: a card that fails
//! verification is a declined payment, not a request validation
//! error, so the orchestrator runs its compensation path.

use async_trait::async_trait;

use crate::checkout::error::{CheckoutError, CheckoutResult};
use crate::checkout::payment::{PaymentProcessor, Settlement};
use shared::checkout::{PaymentDetail, PaymentInput, PaymentStatus, StoredCard};
use shared::util::{new_id, now_millis};

const MIN_CARD_DIGITS: usize = 12;
const MAX_CARD_DIGITS: usize = 19;

pub struct CreditCardProcessor;

impl CreditCardProcessor {
    fn verify(card_number: &str, cvv: &str, expiration_date: &str) -> CheckoutResult<()> {
        let digits = card_number.chars().filter(|c| c.is_ascii_digit()).count();
        if digits != card_number.len() || !(MIN_CARD_DIGITS..=MAX_CARD_DIGITS).contains(&digits) {
            return Err(CheckoutError::PaymentDeclined(
                "card number rejected".to_string(),
            ));
        }

        if !(cvv.len() == 3 || cvv.len() == 4) || !cvv.chars().all(|c| c.is_ascii_digit()) {
            return Err(CheckoutError::PaymentDeclined("cvv rejected".to_string()));
        }

        // Expected format: MM-YY
        let valid_expiry = match expiration_date.split_once('-') {
            Some((month, year)) => {
                month.len() == 2
                    && year.len() == 2
                    && month.parse::<u8>().is_ok_and(|m| (1..=12).contains(&m))
                    && year.parse::<u8>().is_ok()
            }
            None => false,
        };
        if !valid_expiry {
            return Err(CheckoutError::PaymentDeclined(
                "expiration date rejected".to_string(),
            ));
        }

        Ok(())
    }

    fn last4(card_number: &str) -> String {
        let len = card_number.len();
        card_number[len.saturating_sub(4)..].to_string()
    }
}

#[async_trait]
impl PaymentProcessor for CreditCardProcessor {
    async fn settle(
        &self,
        payment_id: &str,
        user_id: &str,
        _amount: f64,
        input: &PaymentInput,
    ) -> CheckoutResult<Settlement> {
        // Presence is checked before the orchestrator commits any
        // state; absence here means a broken caller.
        let card_number = input
            .card_number
            .as_deref()
            .ok_or_else(|| CheckoutError::Validation("card_number is required".to_string()))?;
        let cvv = input
            .cvv
            .as_deref()
            .ok_or_else(|| CheckoutError::Validation("cvv is required".to_string()))?;
        let expiration_date = input
            .expiration_date
            .as_deref()
            .ok_or_else(|| CheckoutError::Validation("expiration_date is required".to_string()))?;

        Self::verify(card_number, cvv, expiration_date)?;

        let stored_card = input.save_credit_card.then(|| StoredCard {
            id: new_id(),
            user_id: user_id.to_string(),
            card_number: card_number.to_string(),
            expiration_date: expiration_date.to_string(),
            created_at: now_millis(),
        });

        Ok(Settlement {
            status: PaymentStatus::Completed,
            detail: PaymentDetail::CreditCard {
                payment_id: payment_id.to_string(),
                card_last4: Self::last4(card_number),
                expiration_date: expiration_date.to_string(),
            },
            stored_card,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card_input(number: &str, cvv: &str, expiry: &str, save: bool) -> PaymentInput {
        PaymentInput {
            method: "credit_card".to_string(),
            card_number: Some(number.to_string()),
            cvv: Some(cvv.to_string()),
            expiration_date: Some(expiry.to_string()),
            save_credit_card: save,
        }
    }

    #[tokio::test]
    async fn test_valid_card_settles() {
        let input = card_input("4242424242424242", "123", "12-27", false);
        let settlement = CreditCardProcessor
            .settle("pay-1", "u1", 42.0, &input)
            .await
            .unwrap();
        assert_eq!(settlement.status, PaymentStatus::Completed);
        assert!(settlement.stored_card.is_none());
        assert!(matches!(
            settlement.detail,
            PaymentDetail::CreditCard { card_last4, expiration_date, .. }
                if card_last4 == "4242" && expiration_date == "12-27"
        ));
    }

    #[tokio::test]
    async fn test_invalid_cvv_declines() {
        for cvv in ["12", "12345", "12a"] {
            let input = card_input("4242424242424242", cvv, "12-27", false);
            let err = CreditCardProcessor
                .settle("pay-1", "u1", 42.0, &input)
                .await
                .err();
            assert!(matches!(err, Some(CheckoutError::PaymentDeclined(_))), "cvv {cvv}");
        }
    }

    #[tokio::test]
    async fn test_malformed_card_number_declines() {
        for number in ["1234", "4242-4242-4242-4242", "42424242424242424242"] {
            let input = card_input(number, "123", "12-27", false);
            let err = CreditCardProcessor
                .settle("pay-1", "u1", 42.0, &input)
                .await
                .err();
            assert!(matches!(err, Some(CheckoutError::PaymentDeclined(_))), "number {number}");
        }
    }

    #[tokio::test]
    async fn test_malformed_expiry_declines() {
        for expiry in ["1227", "13-27", "00-27", "12/27", "1-27"] {
            let input = card_input("4242424242424242", "123", expiry, false);
            let err = CreditCardProcessor
                .settle("pay-1", "u1", 42.0, &input)
                .await
                .err();
            assert!(matches!(err, Some(CheckoutError::PaymentDeclined(_))), "expiry {expiry}");
        }
    }

    #[tokio::test]
    async fn test_save_card_produces_stored_card() {
        let input = card_input("4242424242424242", "123", "12-27", true);
        let settlement = CreditCardProcessor
            .settle("pay-1", "u1", 42.0, &input)
            .await
            .unwrap();
        let card = settlement.stored_card.unwrap();
        assert_eq!(card.user_id, "u1");
        assert_eq!(card.card_number, "4242424242424242");
        assert_eq!(card.expiration_date, "12-27");
    }
}

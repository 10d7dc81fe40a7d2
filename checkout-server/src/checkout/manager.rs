//! CheckoutManager - checkout orchestration and order lifecycle
//!
//! # Checkout Flow
//!
//! ```text
//! checkout(request)
//!     ├─ 1. Begin write transaction (single writer)
//!     ├─ 2. Resolve session to user
//!     ├─ 3. Collect purchasable cart lines
//!     ├─ 4. Validate payment input
//!     ├─ 5. Price: subtotal, coupon resolution + consumption
//!     ├─ 6. Stage order, order lines, pending payment
//!     ├─ 7. Settle payment via method strategy
//!     ├─ 8. Clear purchased cart lines
//!     ├─ 9. Commit transaction
//!     └─ 10. Broadcast checkout event
//! ```
//!
//! A failure before commit drops the transaction, so no partial state
//! is ever visible. A declined settlement additionally records the
//! cancelled order and failed payment in a fresh transaction so the
//! decline itself is auditable; the cart and coupon are untouched.

use std::sync::Arc;
use std::time::{Duration, Instant};

use redb::WriteTransaction;
use rust_decimal::Decimal;
use tokio::sync::broadcast;

use crate::catalog::CatalogService;
use crate::checkout::coupon;
use crate::checkout::error::{CheckoutError, CheckoutResult};
use crate::checkout::money::{self, to_decimal, to_f64};
use crate::checkout::payment::{PaymentAction, PaymentProcessor};
use crate::checkout::pricing;
use crate::checkout::storage::{CheckoutStorage, StorageError};
use shared::checkout::{
    CartLine, CartLineInput, CartLineUpdate, CheckoutEvent, CheckoutEventKind, CheckoutRequest,
    CheckoutView, CouponAssignInput, CouponAssignment, InclusionStatus, Order, OrderLine,
    OrderStatus, OrderView, Payment, PaymentInput, PaymentMethod, PaymentStatus, SessionView,
    StoredCard,
};
use shared::util::{new_id, now_millis};

/// Checkout event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// CheckoutManager owns the storage and runs the checkout workflow
pub struct CheckoutManager {
    storage: CheckoutStorage,
    event_tx: broadcast::Sender<CheckoutEvent>,
    /// Catalog consulted at cart-add time for the price snapshot
    catalog: Option<Arc<CatalogService>>,
    /// Wall-clock budget for a single checkout
    deadline: Duration,
}

impl std::fmt::Debug for CheckoutManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutManager")
            .field("storage", &"<CheckoutStorage>")
            .field("event_tx", &"<broadcast::Sender>")
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl CheckoutManager {
    pub fn new(storage: CheckoutStorage, deadline: Duration) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            storage,
            event_tx,
            catalog: None,
            deadline,
        }
    }

    /// Set the catalog service for price lookups at cart-add time
    pub fn set_catalog_service(&mut self, catalog: Arc<CatalogService>) {
        self.catalog = Some(catalog);
    }

    /// Subscribe to checkout completion/cancellation events
    pub fn subscribe(&self) -> broadcast::Receiver<CheckoutEvent> {
        self.event_tx.subscribe()
    }

    pub fn storage(&self) -> &CheckoutStorage {
        &self.storage
    }

    // ========== Sessions ==========

    /// Register a new session for a user
    pub fn register_session(&self, user_id: &str) -> CheckoutResult<SessionView> {
        let session_id = new_id();
        let txn = self.storage.begin_write()?;
        self.storage.register_session(&txn, &session_id, user_id)?;
        txn.commit().map_err(StorageError::from)?;
        Ok(SessionView {
            session_id,
            user_id: user_id.to_string(),
        })
    }

    fn require_session(&self, session_id: &str) -> CheckoutResult<String> {
        self.storage
            .resolve_session(session_id)?
            .ok_or_else(|| CheckoutError::SessionNotFound(session_id.to_string()))
    }

    // ========== Cart ==========

    /// Add a line to the session's cart, snapshotting name and price
    /// from the catalog
    pub fn add_cart_line(
        &self,
        session_id: &str,
        input: CartLineInput,
    ) -> CheckoutResult<CartLine> {
        self.require_session(session_id)?;

        let product = self
            .catalog
            .as_ref()
            .and_then(|catalog| catalog.get(&input.product_entry_id))
            .ok_or_else(|| CheckoutError::ProductNotFound(input.product_entry_id.clone()))?;

        if input.quantity <= 0 {
            return Err(CheckoutError::Validation(format!(
                "quantity must be positive, got {}",
                input.quantity
            )));
        }
        money::validate_unit_price(product.unit_price)?;

        let line = CartLine {
            id: new_id(),
            session_id: session_id.to_string(),
            product_entry_id: product.id,
            product_name: product.name,
            quantity: input.quantity,
            unit_price: product.unit_price,
            inclusion: if input.include_in_order {
                InclusionStatus::InOrder
            } else {
                InclusionStatus::InCart
            },
            created_at: now_millis(),
        };

        let txn = self.storage.begin_write()?;
        self.storage.upsert_cart_line(&txn, &line)?;
        txn.commit().map_err(StorageError::from)?;
        Ok(line)
    }

    /// Update quantity and/or inclusion flag of a cart line
    pub fn update_cart_line(
        &self,
        session_id: &str,
        line_id: &str,
        update: CartLineUpdate,
    ) -> CheckoutResult<CartLine> {
        self.require_session(session_id)?;

        let mut line = self
            .storage
            .get_cart_line(session_id, line_id)?
            .ok_or_else(|| CheckoutError::CartLineNotFound(line_id.to_string()))?;

        if let Some(quantity) = update.quantity {
            if quantity <= 0 {
                return Err(CheckoutError::Validation(format!(
                    "quantity must be positive, got {quantity}"
                )));
            }
            line.quantity = quantity;
        }
        if let Some(inclusion) = update.inclusion {
            line.inclusion = inclusion;
        }

        let txn = self.storage.begin_write()?;
        self.storage.upsert_cart_line(&txn, &line)?;
        txn.commit().map_err(StorageError::from)?;
        Ok(line)
    }

    /// Remove a cart line
    pub fn remove_cart_line(&self, session_id: &str, line_id: &str) -> CheckoutResult<()> {
        self.require_session(session_id)?;
        let txn = self.storage.begin_write()?;
        let removed = self.storage.remove_cart_line(&txn, session_id, line_id)?;
        txn.commit().map_err(StorageError::from)?;
        if removed {
            Ok(())
        } else {
            Err(CheckoutError::CartLineNotFound(line_id.to_string()))
        }
    }

    /// List the session's cart
    pub fn list_cart(&self, session_id: &str) -> CheckoutResult<Vec<CartLine>> {
        self.require_session(session_id)?;
        Ok(self.storage.list_cart(session_id)?)
    }

    // ========== Coupons ==========

    /// Grant a coupon assignment to a user
    pub fn assign_coupon(&self, input: CouponAssignInput) -> CheckoutResult<CouponAssignment> {
        money::validate_discount(input.discount_amount)?;
        if input.valid_from > input.valid_to {
            return Err(CheckoutError::Validation(format!(
                "validity window is inverted ({} > {})",
                input.valid_from, input.valid_to
            )));
        }

        let assignment = CouponAssignment {
            coupon_id: if input.coupon_id.is_empty() {
                new_id()
            } else {
                input.coupon_id
            },
            user_id: input.user_id,
            discount_amount: input.discount_amount,
            is_active: true,
            valid_from: input.valid_from,
            valid_to: input.valid_to,
        };

        let txn = self.storage.begin_write()?;
        self.storage.upsert_coupon(&txn, &assignment)?;
        txn.commit().map_err(StorageError::from)?;
        Ok(assignment)
    }

    /// List a user's coupon assignments
    pub fn list_coupons(&self, user_id: &str) -> CheckoutResult<Vec<CouponAssignment>> {
        Ok(self.storage.list_coupons(user_id)?)
    }

    /// List a user's stored cards
    pub fn list_stored_cards(&self, user_id: &str) -> CheckoutResult<Vec<StoredCard>> {
        Ok(self.storage.list_stored_cards(user_id)?)
    }

    // ========== Checkout ==========

    /// Run the full checkout workflow for a session
    pub fn checkout(&self, request: CheckoutRequest) -> CheckoutResult<CheckoutView> {
        let started = Instant::now();
        let now = now_millis();

        validate_payment_input(&request.payment)?;
        let (method, action) = PaymentAction::for_input(&request.payment)?;

        let txn = self.storage.begin_write()?;

        let user_id = self
            .storage
            .resolve_session_txn(&txn, &request.session_id)?
            .ok_or_else(|| CheckoutError::SessionNotFound(request.session_id.clone()))?;

        let cart_lines = self.storage.list_purchasable_txn(&txn, &request.session_id)?;
        if cart_lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        self.check_deadline(started)?;

        // Pricing from the cart's price snapshot
        let subtotal = pricing::subtotal(&cart_lines);
        let (coupon_id, discount) = self.consume_best_coupon(&txn, &user_id, now)?;
        let total = pricing::apply_discount(subtotal, discount);
        self.check_deadline(started)?;

        // Stage the order aggregate
        let order = Order {
            id: new_id(),
            user_id: user_id.clone(),
            total: to_f64(total),
            status: OrderStatus::Preparing,
            coupon_id,
            discount_amount: to_f64(discount.min(subtotal)),
            created_at: now,
        };
        let order_lines: Vec<OrderLine> = cart_lines
            .iter()
            .map(|line| OrderLine {
                id: new_id(),
                order_id: order.id.clone(),
                product_entry_id: line.product_entry_id.clone(),
                product_name: line.product_name.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect();

        self.storage.store_order(&txn, &order)?;
        for line in &order_lines {
            self.storage.store_order_line(&txn, line)?;
        }

        let mut payment = Payment {
            id: new_id(),
            order_id: order.id.clone(),
            amount: order.total,
            status: PaymentStatus::Pending,
            method,
            created_at: now,
        };
        self.storage.store_payment(&txn, &payment)?;
        self.check_deadline(started)?;

        // Settle through the method strategy
        let settlement = futures::executor::block_on(action.settle(
            &payment.id,
            &user_id,
            payment.amount,
            &request.payment,
        ));
        let settlement = match settlement {
            Ok(settlement) => settlement,
            Err(err @ CheckoutError::PaymentDeclined(_)) => {
                // Roll back everything staged so far, then record the
                // decline for audit
                drop(txn);
                self.record_declined_checkout(&order, &order_lines, &payment);
                self.broadcast(CheckoutEventKind::Cancelled, &order, PaymentStatus::Failed);
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        payment.status = settlement.status;
        self.storage.store_payment(&txn, &payment)?;
        self.storage
            .store_payment_detail(&txn, &order.id, &settlement.detail)?;
        if let Some(card) = &settlement.stored_card {
            self.storage.store_card(&txn, card)?;
        }

        let order = Order {
            status: OrderStatus::Placed,
            ..order
        };
        self.storage.store_order(&txn, &order)?;

        // Cart clearing is the last step before commit
        for line in &cart_lines {
            self.storage
                .remove_cart_line(&txn, &request.session_id, &line.id)?;
        }
        self.check_deadline(started)?;

        txn.commit().map_err(StorageError::from)?;

        self.broadcast(CheckoutEventKind::Completed, &order, payment.status);
        tracing::info!(
            order_id = %order.id,
            user_id = %order.user_id,
            total = order.total,
            method = %payment.method.as_str(),
            "checkout completed"
        );

        Ok(CheckoutView {
            order,
            lines: order_lines,
            payment_status: payment.status,
        })
    }

    /// Resolve and consume the applicable coupon, if any. Returns the
    /// consumed coupon id and its discount.
    fn consume_best_coupon(
        &self,
        txn: &WriteTransaction,
        user_id: &str,
        now: i64,
    ) -> CheckoutResult<(Option<String>, Decimal)> {
        let coupons = self.storage.list_coupons_txn(txn, user_id)?;
        let Some(candidate) = coupon::resolve_active(&coupons, now) else {
            return Ok((None, Decimal::ZERO));
        };
        if !self
            .storage
            .consume_coupon(txn, user_id, &candidate.coupon_id, now)?
        {
            // The snapshot we just read disagrees with the consume;
            // only possible if the assignment row is corrupt
            return Err(CheckoutError::CouponUnavailable(candidate.coupon_id.clone()));
        }
        Ok((
            Some(candidate.coupon_id.clone()),
            to_decimal(candidate.discount_amount),
        ))
    }

    /// Best-effort audit trail for a declined settlement: cancelled
    /// order, its lines, and the failed payment. The cart and coupon
    /// state were already rolled back with the main transaction.
    fn record_declined_checkout(&self, order: &Order, lines: &[OrderLine], payment: &Payment) {
        let result = (|| -> CheckoutResult<()> {
            let txn = self.storage.begin_write()?;
            let cancelled = Order {
                status: OrderStatus::Cancelled,
                coupon_id: None,
                discount_amount: 0.0,
                ..order.clone()
            };
            self.storage.store_order(&txn, &cancelled)?;
            for line in lines {
                self.storage.store_order_line(&txn, line)?;
            }
            let failed = Payment {
                status: PaymentStatus::Failed,
                ..payment.clone()
            };
            self.storage.store_payment(&txn, &failed)?;
            txn.commit().map_err(StorageError::from)?;
            Ok(())
        })();
        if let Err(err) = result {
            tracing::error!(order_id = %order.id, error = %err, "failed to record declined checkout");
        }
    }

    fn check_deadline(&self, started: Instant) -> CheckoutResult<()> {
        if started.elapsed() > self.deadline {
            return Err(CheckoutError::DeadlineExceeded);
        }
        Ok(())
    }

    fn broadcast(&self, kind: CheckoutEventKind, order: &Order, payment_status: PaymentStatus) {
        let event = CheckoutEvent {
            kind,
            order_id: order.id.clone(),
            user_id: order.user_id.clone(),
            total: order.total,
            payment_status,
            timestamp: now_millis(),
        };
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }

    // ========== Orders ==========

    /// Advance an order through its fulfillment lifecycle
    ///
    /// Transitions only move forward (placed → shipped → delivered);
    /// cancellation is allowed from any non-terminal state; terminal
    /// orders are immutable.
    pub fn update_status(&self, order_id: &str, status_input: &str) -> CheckoutResult<Order> {
        let target = OrderStatus::from_input(status_input)
            .ok_or_else(|| CheckoutError::InvalidStatus(status_input.to_string()))?;

        let txn = self.storage.begin_write()?;
        let mut order = self
            .storage
            .get_order_txn(&txn, order_id)?
            .ok_or_else(|| CheckoutError::OrderNotFound(order_id.to_string()))?;

        if order.status.is_terminal() {
            return Err(CheckoutError::OrderFinalized(order_id.to_string()));
        }
        if !transition_allowed(order.status, target) {
            return Err(CheckoutError::InvalidStatus(format!(
                "cannot move from {:?} to {:?}",
                order.status, target
            )));
        }

        order.status = target;
        self.storage.store_order(&txn, &order)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(order_id = %order.id, status = ?order.status, "order status updated");
        Ok(order)
    }

    /// Full read model of an order
    pub fn order_view(&self, order_id: &str) -> CheckoutResult<OrderView> {
        let order = self
            .storage
            .get_order(order_id)?
            .ok_or_else(|| CheckoutError::OrderNotFound(order_id.to_string()))?;
        let lines = self.storage.list_order_lines(order_id)?;
        let payment = self.storage.get_payment(order_id)?;
        Ok(OrderView {
            order,
            lines,
            payment,
        })
    }
}

// Forward-only lifecycle rank; Cancelled reachable from any
// non-terminal state (the caller has already rejected terminal `from`
// states)
fn transition_allowed(from: OrderStatus, to: OrderStatus) -> bool {
    fn rank(status: OrderStatus) -> u8 {
        match status {
            OrderStatus::Preparing => 0,
            OrderStatus::Placed => 1,
            OrderStatus::Shipped => 2,
            OrderStatus::Delivered => 3,
            OrderStatus::Cancelled => 4,
        }
    }
    to == OrderStatus::Cancelled || rank(to) > rank(from)
}

fn validate_payment_input(input: &PaymentInput) -> CheckoutResult<()> {
    let Some(method) = PaymentMethod::from_input(&input.method) else {
        return Err(CheckoutError::UnsupportedPaymentMethod(input.method.clone()));
    };
    if method == PaymentMethod::CreditCard {
        for (value, field) in [
            (&input.card_number, "card_number"),
            (&input.cvv, "cvv"),
            (&input.expiration_date, "expiration_date"),
        ] {
            match value {
                Some(v) if !v.trim().is_empty() => {}
                _ => {
                    return Err(CheckoutError::Validation(format!(
                        "{field} is required for credit card payments"
                    )));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::checkout::ProductEntry;

    fn manager_with_catalog() -> (CheckoutManager, Arc<CatalogService>) {
        let storage = CheckoutStorage::open_in_memory().unwrap();
        let mut manager = CheckoutManager::new(storage, Duration::from_secs(10));
        let catalog = Arc::new(CatalogService::new());
        catalog.upsert(ProductEntry {
            id: "espresso".to_string(),
            name: "Espresso".to_string(),
            unit_price: 1.5,
        });
        catalog.upsert(ProductEntry {
            id: "croissant".to_string(),
            name: "Croissant".to_string(),
            unit_price: 2.2,
        });
        manager.set_catalog_service(catalog.clone());
        (manager, catalog)
    }

    fn cash_payment() -> PaymentInput {
        PaymentInput {
            method: "cash".to_string(),
            card_number: None,
            cvv: None,
            expiration_date: None,
            save_credit_card: false,
        }
    }

    fn card_payment(cvv: &str) -> PaymentInput {
        PaymentInput {
            method: "credit_card".to_string(),
            card_number: Some("4242424242424242".to_string()),
            cvv: Some(cvv.to_string()),
            expiration_date: Some("12-27".to_string()),
            save_credit_card: false,
        }
    }

    fn filled_session(manager: &CheckoutManager) -> SessionView {
        let session = manager.register_session("u1").unwrap();
        manager
            .add_cart_line(
                &session.session_id,
                CartLineInput {
                    product_entry_id: "espresso".to_string(),
                    quantity: 2,
                    include_in_order: true,
                },
            )
            .unwrap();
        manager
            .add_cart_line(
                &session.session_id,
                CartLineInput {
                    product_entry_id: "croissant".to_string(),
                    quantity: 1,
                    include_in_order: true,
                },
            )
            .unwrap();
        session
    }

    #[test]
    fn test_cash_checkout_happy_path() {
        let (manager, _) = manager_with_catalog();
        let session = filled_session(&manager);

        let view = manager
            .checkout(CheckoutRequest {
                session_id: session.session_id.clone(),
                payment: cash_payment(),
            })
            .unwrap();

        assert_eq!(view.order.status, OrderStatus::Placed);
        assert_eq!(view.order.total, 5.2);
        assert_eq!(view.lines.len(), 2);
        assert_eq!(view.payment_status, PaymentStatus::Completed);

        // Cart cleared
        assert!(manager.list_cart(&session.session_id).unwrap().is_empty());

        // Persisted read model agrees
        let persisted = manager.order_view(&view.order.id).unwrap();
        assert_eq!(persisted.order.status, OrderStatus::Placed);
        assert_eq!(
            persisted.payment.as_ref().map(|p| p.status),
            Some(PaymentStatus::Completed)
        );
    }

    #[test]
    fn test_empty_cart_rejected() {
        let (manager, _) = manager_with_catalog();
        let session = manager.register_session("u1").unwrap();
        let err = manager
            .checkout(CheckoutRequest {
                session_id: session.session_id,
                payment: cash_payment(),
            })
            .err();
        assert!(matches!(err, Some(CheckoutError::EmptyCart)));
    }

    #[test]
    fn test_in_cart_lines_excluded_from_order() {
        let (manager, _) = manager_with_catalog();
        let session = filled_session(&manager);
        let cart = manager.list_cart(&session.session_id).unwrap();
        // Keep the croissant out of the purchase
        let croissant = cart
            .iter()
            .find(|l| l.product_entry_id == "croissant")
            .unwrap();
        manager
            .update_cart_line(
                &session.session_id,
                &croissant.id,
                CartLineUpdate {
                    quantity: None,
                    inclusion: Some(InclusionStatus::InCart),
                },
            )
            .unwrap();

        let view = manager
            .checkout(CheckoutRequest {
                session_id: session.session_id.clone(),
                payment: cash_payment(),
            })
            .unwrap();

        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.order.total, 3.0);

        // The excluded line survives in the cart
        let remaining = manager.list_cart(&session.session_id).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].product_entry_id, "croissant");
    }

    #[test]
    fn test_coupon_applied_and_consumed_once() {
        let (manager, _) = manager_with_catalog();
        let session = filled_session(&manager);
        manager
            .assign_coupon(CouponAssignInput {
                coupon_id: "welcome".to_string(),
                user_id: "u1".to_string(),
                discount_amount: 2.0,
                valid_from: 0,
                valid_to: i64::MAX,
            })
            .unwrap();

        let view = manager
            .checkout(CheckoutRequest {
                session_id: session.session_id,
                payment: cash_payment(),
            })
            .unwrap();
        assert_eq!(view.order.coupon_id.as_deref(), Some("welcome"));
        assert_eq!(view.order.total, 3.2);
        assert_eq!(view.order.discount_amount, 2.0);

        // A second checkout for the same user gets no discount
        let session2 = filled_session(&manager);
        let view2 = manager
            .checkout(CheckoutRequest {
                session_id: session2.session_id,
                payment: cash_payment(),
            })
            .unwrap();
        assert_eq!(view2.order.coupon_id, None);
        assert_eq!(view2.order.total, 5.2);
    }

    #[test]
    fn test_oversized_coupon_clamps_to_free_order() {
        let (manager, _) = manager_with_catalog();
        let session = filled_session(&manager);
        manager
            .assign_coupon(CouponAssignInput {
                coupon_id: "mega".to_string(),
                user_id: "u1".to_string(),
                discount_amount: 100.0,
                valid_from: 0,
                valid_to: i64::MAX,
            })
            .unwrap();

        let view = manager
            .checkout(CheckoutRequest {
                session_id: session.session_id,
                payment: cash_payment(),
            })
            .unwrap();
        assert_eq!(view.order.total, 0.0);
        // Recorded discount is what was actually applied
        assert_eq!(view.order.discount_amount, 5.2);
    }

    #[test]
    fn test_declined_card_compensates() {
        let (manager, _) = manager_with_catalog();
        let session = filled_session(&manager);
        manager
            .assign_coupon(CouponAssignInput {
                coupon_id: "welcome".to_string(),
                user_id: "u1".to_string(),
                discount_amount: 2.0,
                valid_from: 0,
                valid_to: i64::MAX,
            })
            .unwrap();
        let mut events = manager.subscribe();

        let err = manager
            .checkout(CheckoutRequest {
                session_id: session.session_id.clone(),
                payment: card_payment("1"),
            })
            .err();
        assert!(matches!(err, Some(CheckoutError::PaymentDeclined(_))));

        // Cart untouched, coupon still active
        assert_eq!(manager.list_cart(&session.session_id).unwrap().len(), 2);
        let coupons = manager.list_coupons("u1").unwrap();
        assert!(coupons[0].is_active);

        // The decline left an auditable cancelled order + failed payment
        let event = events.try_recv().unwrap();
        assert_eq!(event.kind, CheckoutEventKind::Cancelled);
        let view = manager.order_view(&event.order_id).unwrap();
        assert_eq!(view.order.status, OrderStatus::Cancelled);
        assert_eq!(view.order.coupon_id, None);
        assert_eq!(
            view.payment.as_ref().map(|p| p.status),
            Some(PaymentStatus::Failed)
        );

        // Coupon survives to the retry
        let view = manager
            .checkout(CheckoutRequest {
                session_id: session.session_id,
                payment: card_payment("123"),
            })
            .unwrap();
        assert_eq!(view.order.coupon_id.as_deref(), Some("welcome"));
    }

    #[test]
    fn test_missing_card_fields_is_validation_without_side_effects() {
        let (manager, _) = manager_with_catalog();
        let session = filled_session(&manager);

        let err = manager
            .checkout(CheckoutRequest {
                session_id: session.session_id.clone(),
                payment: PaymentInput {
                    method: "credit_card".to_string(),
                    card_number: None,
                    cvv: None,
                    expiration_date: None,
                    save_credit_card: false,
                },
            })
            .err();
        assert!(matches!(err, Some(CheckoutError::Validation(_))));
        assert_eq!(manager.list_cart(&session.session_id).unwrap().len(), 2);
    }

    #[test]
    fn test_save_card_persists_on_success() {
        let (manager, _) = manager_with_catalog();
        let session = filled_session(&manager);
        let mut payment = card_payment("123");
        payment.save_credit_card = true;

        manager
            .checkout(CheckoutRequest {
                session_id: session.session_id,
                payment,
            })
            .unwrap();

        let cards = manager.list_stored_cards("u1").unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].card_number, "4242424242424242");
    }

    #[test]
    fn test_checkout_idempotent_pricing() {
        let (manager, catalog) = manager_with_catalog();
        let session = filled_session(&manager);

        // Price change after the cart snapshot must not leak into the
        // order total
        catalog.upsert(ProductEntry {
            id: "espresso".to_string(),
            name: "Espresso".to_string(),
            unit_price: 9.9,
        });

        let view = manager
            .checkout(CheckoutRequest {
                session_id: session.session_id,
                payment: cash_payment(),
            })
            .unwrap();
        assert_eq!(view.order.total, 5.2);
    }

    #[test]
    fn test_deadline_exceeded_leaves_no_state() {
        let storage = CheckoutStorage::open_in_memory().unwrap();
        let mut manager = CheckoutManager::new(storage, Duration::ZERO);
        let catalog = Arc::new(CatalogService::new());
        catalog.upsert(ProductEntry {
            id: "espresso".to_string(),
            name: "Espresso".to_string(),
            unit_price: 1.5,
        });
        manager.set_catalog_service(catalog);

        let session = manager.register_session("u1").unwrap();
        manager
            .add_cart_line(
                &session.session_id,
                CartLineInput {
                    product_entry_id: "espresso".to_string(),
                    quantity: 1,
                    include_in_order: true,
                },
            )
            .unwrap();

        let err = manager
            .checkout(CheckoutRequest {
                session_id: session.session_id.clone(),
                payment: cash_payment(),
            })
            .err();
        assert!(matches!(err, Some(CheckoutError::DeadlineExceeded)));
        assert_eq!(manager.list_cart(&session.session_id).unwrap().len(), 1);
    }

    // Two widgets at 10.00 plus one gadget at 5.00, the canonical
    // fixture for the discount arithmetic tests below
    fn twenty_five_unit_session(manager: &CheckoutManager, catalog: &CatalogService) -> SessionView {
        catalog.upsert(ProductEntry {
            id: "widget".to_string(),
            name: "Widget".to_string(),
            unit_price: 10.0,
        });
        catalog.upsert(ProductEntry {
            id: "gadget".to_string(),
            name: "Gadget".to_string(),
            unit_price: 5.0,
        });
        let session = manager.register_session("u2").unwrap();
        manager
            .add_cart_line(
                &session.session_id,
                CartLineInput {
                    product_entry_id: "widget".to_string(),
                    quantity: 2,
                    include_in_order: true,
                },
            )
            .unwrap();
        manager
            .add_cart_line(
                &session.session_id,
                CartLineInput {
                    product_entry_id: "gadget".to_string(),
                    quantity: 1,
                    include_in_order: true,
                },
            )
            .unwrap();
        session
    }

    #[test]
    fn test_cash_total_without_coupon() {
        let (manager, catalog) = manager_with_catalog();
        let session = twenty_five_unit_session(&manager, &catalog);
        let view = manager
            .checkout(CheckoutRequest {
                session_id: session.session_id,
                payment: cash_payment(),
            })
            .unwrap();
        assert_eq!(view.order.total, 25.0);
        assert_eq!(view.order.discount_amount, 0.0);
        assert_eq!(view.payment_status, PaymentStatus::Completed);
    }

    #[test]
    fn test_fixed_coupon_reduces_total() {
        let (manager, catalog) = manager_with_catalog();
        let session = twenty_five_unit_session(&manager, &catalog);
        manager
            .assign_coupon(CouponAssignInput {
                coupon_id: "five-off".to_string(),
                user_id: "u2".to_string(),
                discount_amount: 5.0,
                valid_from: 0,
                valid_to: i64::MAX,
            })
            .unwrap();
        let view = manager
            .checkout(CheckoutRequest {
                session_id: session.session_id,
                payment: cash_payment(),
            })
            .unwrap();
        assert_eq!(view.order.total, 20.0);
        assert!(!manager.list_coupons("u2").unwrap()[0].is_active);
    }

    #[test]
    fn test_status_lifecycle() {
        let (manager, _) = manager_with_catalog();
        let session = filled_session(&manager);
        let view = manager
            .checkout(CheckoutRequest {
                session_id: session.session_id,
                payment: cash_payment(),
            })
            .unwrap();
        let order_id = view.order.id;

        assert!(manager.update_status(&order_id, "shipped").is_ok());
        // Backward move rejected
        assert!(matches!(
            manager.update_status(&order_id, "placed").err(),
            Some(CheckoutError::InvalidStatus(_))
        ));
        assert!(manager.update_status(&order_id, "delivered").is_ok());
        // Terminal orders are immutable
        assert!(matches!(
            manager.update_status(&order_id, "cancelled").err(),
            Some(CheckoutError::OrderFinalized(_))
        ));
        // Unknown status strings are rejected by the allow-list
        assert!(matches!(
            manager.update_status(&order_id, "teleported").err(),
            Some(CheckoutError::InvalidStatus(_))
        ));
    }

    #[test]
    fn test_unknown_order_and_session() {
        let (manager, _) = manager_with_catalog();
        assert!(matches!(
            manager.order_view("missing").err(),
            Some(CheckoutError::OrderNotFound(_))
        ));
        assert!(matches!(
            manager.list_cart("missing").err(),
            Some(CheckoutError::SessionNotFound(_))
        ));
    }
}

//! Shared types for the checkout workflow

use serde::{Deserialize, Serialize};

// ============================================================================
// Cart
// ============================================================================

/// Whether a cart line is still being edited or has been selected
/// for purchase.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InclusionStatus {
    /// In the basket, not yet selected for checkout
    #[default]
    InCart,
    /// Selected for checkout; picked up by the orchestrator
    InOrder,
}

/// One product entry and quantity pending purchase within a shopping
/// session.
///
/// `unit_price` is snapshotted from the catalog when the line is
/// created and never re-read, so mid-checkout catalog price changes
/// cannot alter an in-flight order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    pub id: String,
    pub session_id: String,
    pub product_entry_id: String,
    pub product_name: String,
    pub quantity: i32,
    /// Price snapshot taken at cart-add time (currency units)
    pub unit_price: f64,
    pub inclusion: InclusionStatus,
    /// Creation time (epoch millis)
    pub created_at: i64,
}

/// Add-to-cart payload. The unit price is NOT accepted from the
/// caller; it is snapshotted from the catalog server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CartLineInput {
    pub product_entry_id: String,
    pub quantity: i32,
    /// Whether the line is immediately selected for checkout
    #[serde(default = "default_include_in_order")]
    pub include_in_order: bool,
}

fn default_include_in_order() -> bool {
    true
}

/// Allow-listed cart line update. Unknown fields are rejected at the
/// boundary instead of being patched onto the entity.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct CartLineUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inclusion: Option<InclusionStatus>,
}

// ============================================================================
// Order
// ============================================================================

/// Order fulfillment status.
///
/// Transitions: `Preparing → {Placed|Cancelled}`, then
/// `Placed → Shipped → Delivered` or `Placed → Cancelled`.
/// `Delivered` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Preparing,
    Placed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Parse a status value from the admin status-update allow-list.
    ///
    /// Accepts exactly `preparing`, `placed`, `shipped`, `delivered`,
    /// `cancelled` (case-insensitive). Anything else is rejected.
    pub fn from_input(value: &str) -> Option<Self> {
        let v = value.trim();
        let status = if v.eq_ignore_ascii_case("preparing") {
            Self::Preparing
        } else if v.eq_ignore_ascii_case("placed") {
            Self::Placed
        } else if v.eq_ignore_ascii_case("shipped") {
            Self::Shipped
        } else if v.eq_ignore_ascii_case("delivered") {
            Self::Delivered
        } else if v.eq_ignore_ascii_case("cancelled") {
            Self::Cancelled
        } else {
            return None;
        };
        Some(status)
    }

    /// Terminal orders are immutable.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

/// Order aggregate root. Owns its order lines and its single payment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    /// Final total after discount (currency units, never negative)
    pub total: f64,
    pub status: OrderStatus,
    /// Consumed coupon, if a discount was applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_id: Option<String>,
    /// Discount actually subtracted from the subtotal
    pub discount_amount: f64,
    /// Creation time (epoch millis)
    pub created_at: i64,
}

/// Immutable, price-snapshotted record of a purchased product entry
/// within a placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    pub id: String,
    pub order_id: String,
    pub product_entry_id: String,
    pub product_name: String,
    pub quantity: i32,
    /// Price snapshot at purchase time (currency units)
    pub unit_price: f64,
}

// ============================================================================
// Payment
// ============================================================================

/// Payment settlement status. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

/// Supported payment methods.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
}

impl PaymentMethod {
    /// Parse a method from request input (`cash` / `credit_card`,
    /// case-insensitive). Unknown methods yield `None` and are
    /// surfaced as `UnsupportedPaymentMethod` at the dispatch point.
    pub fn from_input(value: &str) -> Option<Self> {
        let v = value.trim();
        if v.eq_ignore_ascii_case("cash") {
            Some(Self::Cash)
        } else if v.eq_ignore_ascii_case("credit_card") {
            Some(Self::CreditCard)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::CreditCard => "credit_card",
        }
    }
}

/// Payment record. Exactly one per order; its status is the terminal
/// signal consumed by reporting/notification collaborators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub amount: f64,
    pub status: PaymentStatus,
    pub method: PaymentMethod,
    /// Creation time (epoch millis)
    pub created_at: i64,
}

/// Method-specific payment record. At most one per payment, matching
/// `payment.method`. Card data is reduced to last4 + expiry before it
/// is ever persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentDetail {
    Cash {
        payment_id: String,
    },
    CreditCard {
        payment_id: String,
        card_last4: String,
        expiration_date: String,
    },
}

impl PaymentDetail {
    pub fn payment_id(&self) -> &str {
        match self {
            Self::Cash { payment_id } | Self::CreditCard { payment_id, .. } => payment_id,
        }
    }
}

/// Reusable card saved to the user's profile when
/// `save_credit_card = true`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredCard {
    pub id: String,
    pub user_id: String,
    pub card_number: String,
    pub expiration_date: String,
    /// Creation time (epoch millis)
    pub created_at: i64,
}

// ============================================================================
// Coupon
// ============================================================================

/// The many-to-many link granting a user a discount coupon for a
/// bounded validity window. A coupon is applied to at most one order;
/// consumption flips `is_active` to false atomically with order
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CouponAssignment {
    pub coupon_id: String,
    pub user_id: String,
    /// Fixed discount amount (currency units)
    pub discount_amount: f64,
    pub is_active: bool,
    /// Window start (epoch millis, inclusive)
    pub valid_from: i64,
    /// Window end (epoch millis, inclusive)
    pub valid_to: i64,
}

impl CouponAssignment {
    /// Whether the assignment can be applied at `now`.
    pub fn is_valid_at(&self, now: i64) -> bool {
        self.is_active && self.valid_from <= now && now <= self.valid_to
    }
}

/// Assign-coupon payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CouponAssignInput {
    /// Caller-supplied id; one is generated when left empty
    #[serde(default)]
    pub coupon_id: String,
    pub user_id: String,
    pub discount_amount: f64,
    pub valid_from: i64,
    pub valid_to: i64,
}

// ============================================================================
// Checkout request / response
// ============================================================================

/// Method-specific payment input for checkout.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PaymentInput {
    /// `cash` or `credit_card`
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvv: Option<String>,
    /// `MM-YY`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    /// Persist the card to the user's profile for reuse
    #[serde(default)]
    pub save_credit_card: bool,
}

/// Checkout entry-point payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub session_id: String,
    pub payment: PaymentInput,
}

/// Successful checkout response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutView {
    pub order: Order,
    pub lines: Vec<OrderLine>,
    pub payment_status: PaymentStatus,
}

/// Order detail view (order + lines + payment, if any).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
    pub order: Order,
    pub lines: Vec<OrderLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<Payment>,
}

/// Status-update payload for the admin endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusUpdate {
    pub status: String,
}

// ============================================================================
// Events (notification collaborator interface)
// ============================================================================

/// Checkout outcome kinds broadcast to subscribers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckoutEventKind {
    Completed,
    Cancelled,
}

/// Event emitted after a checkout attempt reaches a terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutEvent {
    pub kind: CheckoutEventKind,
    pub order_id: String,
    pub user_id: String,
    pub total: f64,
    pub payment_status: PaymentStatus,
    /// Event time (epoch millis)
    pub timestamp: i64,
}

// ============================================================================
// Collaborator inputs
// ============================================================================

/// Catalog entry: the price source consulted at cart-add time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductEntry {
    pub id: String,
    pub name: String,
    /// Live catalog price (currency units)
    pub unit_price: f64,
}

/// Session registration payload (identity collaborator).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionRegister {
    pub user_id: String,
}

/// Session registration response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: String,
    pub user_id: String,
}

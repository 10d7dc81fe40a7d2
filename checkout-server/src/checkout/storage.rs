//! redb-based storage layer for the checkout workflow
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `sessions` | `session_id` | `user_id` | Identity mapping |
//! | `cart_lines` | `(session_id, line_id)` | `CartLine` | Shopping baskets |
//! | `orders` | `order_id` | `Order` | Order aggregates |
//! | `order_lines` | `(order_id, line_id)` | `OrderLine` | Price-snapshotted lines |
//! | `payments` | `order_id` | `Payment` | One payment per order |
//! | `payment_details` | `order_id` | `PaymentDetail` | Method-specific record |
//! | `coupon_assignments` | `(user_id, coupon_id)` | `CouponAssignment` | Discount grants |
//! | `stored_cards` | `(user_id, card_id)` | `StoredCard` | Saved cards |
//!
//! # Atomicity
//!
//! redb write transactions are single-writer and atomic: the whole
//! checkout runs inside one `WriteTransaction`, so concurrent
//! checkouts for the same user serialize at `begin_write` and partial
//! writes are never visible to readers. Dropping the transaction
//! without committing discards every staged write.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use shared::checkout::{
    CartLine, CouponAssignment, InclusionStatus, Order, OrderLine, Payment, PaymentDetail,
    StoredCard,
};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Identity mapping: key = session_id, value = user_id
const SESSIONS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("sessions");

/// Cart lines: key = (session_id, line_id), value = JSON-serialized CartLine
const CART_LINES_TABLE: TableDefinition<(&str, &str), &[u8]> = TableDefinition::new("cart_lines");

/// Orders: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Order lines: key = (order_id, line_id), value = JSON-serialized OrderLine
const ORDER_LINES_TABLE: TableDefinition<(&str, &str), &[u8]> =
    TableDefinition::new("order_lines");

/// Payments: key = order_id (exactly one payment per order)
const PAYMENTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("payments");

/// Payment details: key = order_id, value = JSON-serialized PaymentDetail
const PAYMENT_DETAILS_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new("payment_details");

/// Coupon assignments: key = (user_id, coupon_id)
const COUPONS_TABLE: TableDefinition<(&str, &str), &[u8]> =
    TableDefinition::new("coupon_assignments");

/// Stored cards: key = (user_id, card_id)
const STORED_CARDS_TABLE: TableDefinition<(&str, &str), &[u8]> =
    TableDefinition::new("stored_cards");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Order not found: {0}")]
    OrderNotFound(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Checkout storage backed by redb
#[derive(Clone)]
pub struct CheckoutStorage {
    db: Arc<Database>,
}

impl CheckoutStorage {
    /// Open or create the database at the given path
    ///
    /// redb commits are durable as soon as `commit()` returns and the
    /// file is always in a consistent state (copy-on-write with
    /// atomic pointer swap), so an unclean shutdown can never expose
    /// a half-written checkout.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init_tables(db)
    }

    /// Open an in-memory database (tests and ephemeral runs)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init_tables(db)
    }

    fn init_tables(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SESSIONS_TABLE)?;
            let _ = write_txn.open_table(CART_LINES_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(ORDER_LINES_TABLE)?;
            let _ = write_txn.open_table(PAYMENTS_TABLE)?;
            let _ = write_txn.open_table(PAYMENT_DETAILS_TABLE)?;
            let _ = write_txn.open_table(COUPONS_TABLE)?;
            let _ = write_txn.open_table(STORED_CARDS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Sessions ==========

    /// Register a session → user mapping
    pub fn register_session(
        &self,
        txn: &WriteTransaction,
        session_id: &str,
        user_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(SESSIONS_TABLE)?;
        table.insert(session_id, user_id)?;
        Ok(())
    }

    /// Resolve a session to its user (read-only)
    pub fn resolve_session(&self, session_id: &str) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SESSIONS_TABLE)?;
        Ok(table.get(session_id)?.map(|g| g.value().to_string()))
    }

    /// Resolve a session within a write transaction
    pub fn resolve_session_txn(
        &self,
        txn: &WriteTransaction,
        session_id: &str,
    ) -> StorageResult<Option<String>> {
        let table = txn.open_table(SESSIONS_TABLE)?;
        Ok(table.get(session_id)?.map(|g| g.value().to_string()))
    }

    // ========== Cart lines ==========

    /// Insert or update a cart line
    pub fn upsert_cart_line(&self, txn: &WriteTransaction, line: &CartLine) -> StorageResult<()> {
        let mut table = txn.open_table(CART_LINES_TABLE)?;
        let bytes = serde_json::to_vec(line)?;
        table.insert((line.session_id.as_str(), line.id.as_str()), bytes.as_slice())?;
        Ok(())
    }

    /// Get one cart line (read-only)
    pub fn get_cart_line(
        &self,
        session_id: &str,
        line_id: &str,
    ) -> StorageResult<Option<CartLine>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CART_LINES_TABLE)?;
        match table.get((session_id, line_id))? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// List every cart line for a session (read-only)
    pub fn list_cart(&self, session_id: &str) -> StorageResult<Vec<CartLine>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CART_LINES_TABLE)?;
        Self::collect_cart_lines(&table, session_id, None)
    }

    /// List purchasable cart lines (flagged `in_order`) within a
    /// write transaction. This is the read the orchestrator consumes.
    pub fn list_purchasable_txn(
        &self,
        txn: &WriteTransaction,
        session_id: &str,
    ) -> StorageResult<Vec<CartLine>> {
        let table = txn.open_table(CART_LINES_TABLE)?;
        Self::collect_cart_lines(&table, session_id, Some(InclusionStatus::InOrder))
    }

    fn collect_cart_lines(
        table: &impl ReadableTable<(&'static str, &'static str), &'static [u8]>,
        session_id: &str,
        inclusion: Option<InclusionStatus>,
    ) -> StorageResult<Vec<CartLine>> {
        let mut lines = Vec::new();
        for result in table.range((session_id, "")..)? {
            let (key, value) = result?;
            if key.value().0 != session_id {
                break;
            }
            let line: CartLine = serde_json::from_slice(value.value())?;
            if inclusion.is_none_or(|status| line.inclusion == status) {
                lines.push(line);
            }
        }
        lines.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(lines)
    }

    /// Remove a cart line, re-validating membership. Returns whether
    /// the line was still present.
    pub fn remove_cart_line(
        &self,
        txn: &WriteTransaction,
        session_id: &str,
        line_id: &str,
    ) -> StorageResult<bool> {
        let mut table = txn.open_table(CART_LINES_TABLE)?;
        Ok(table.remove((session_id, line_id))?.is_some())
    }

    // ========== Orders ==========

    /// Store an order (insert or status overwrite)
    pub fn store_order(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let bytes = serde_json::to_vec(order)?;
        table.insert(order.id.as_str(), bytes.as_slice())?;
        Ok(())
    }

    /// Get an order (read-only)
    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Get an order within a write transaction
    pub fn get_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<Order>> {
        let table = txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Store one order line
    pub fn store_order_line(&self, txn: &WriteTransaction, line: &OrderLine) -> StorageResult<()> {
        let mut table = txn.open_table(ORDER_LINES_TABLE)?;
        let bytes = serde_json::to_vec(line)?;
        table.insert((line.order_id.as_str(), line.id.as_str()), bytes.as_slice())?;
        Ok(())
    }

    /// List the lines of an order (read-only)
    pub fn list_order_lines(&self, order_id: &str) -> StorageResult<Vec<OrderLine>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDER_LINES_TABLE)?;
        let mut lines = Vec::new();
        for result in table.range((order_id, "")..)? {
            let (key, value) = result?;
            if key.value().0 != order_id {
                break;
            }
            lines.push(serde_json::from_slice::<OrderLine>(value.value())?);
        }
        lines.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(lines)
    }

    /// Delete an order and everything it owns (lines, payment,
    /// payment detail). The order exclusively owns these records, so
    /// removal cascades.
    pub fn delete_order(&self, txn: &WriteTransaction, order_id: &str) -> StorageResult<bool> {
        let mut orders = txn.open_table(ORDERS_TABLE)?;
        let existed = orders.remove(order_id)?.is_some();
        drop(orders);

        let mut lines = txn.open_table(ORDER_LINES_TABLE)?;
        let line_ids: Vec<String> = {
            let mut ids = Vec::new();
            for result in lines.range((order_id, "")..)? {
                let (key, _) = result?;
                if key.value().0 != order_id {
                    break;
                }
                ids.push(key.value().1.to_string());
            }
            ids
        };
        for id in line_ids {
            lines.remove((order_id, id.as_str()))?;
        }
        drop(lines);

        let mut payments = txn.open_table(PAYMENTS_TABLE)?;
        payments.remove(order_id)?;
        drop(payments);

        let mut details = txn.open_table(PAYMENT_DETAILS_TABLE)?;
        details.remove(order_id)?;

        Ok(existed)
    }

    // ========== Payments ==========

    /// Store the payment for an order
    pub fn store_payment(&self, txn: &WriteTransaction, payment: &Payment) -> StorageResult<()> {
        let mut table = txn.open_table(PAYMENTS_TABLE)?;
        let bytes = serde_json::to_vec(payment)?;
        table.insert(payment.order_id.as_str(), bytes.as_slice())?;
        Ok(())
    }

    /// Get the payment of an order (read-only)
    pub fn get_payment(&self, order_id: &str) -> StorageResult<Option<Payment>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PAYMENTS_TABLE)?;
        match table.get(order_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Store the method-specific payment detail
    pub fn store_payment_detail(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
        detail: &PaymentDetail,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(PAYMENT_DETAILS_TABLE)?;
        let bytes = serde_json::to_vec(detail)?;
        table.insert(order_id, bytes.as_slice())?;
        Ok(())
    }

    /// Get the payment detail of an order (read-only)
    pub fn get_payment_detail(&self, order_id: &str) -> StorageResult<Option<PaymentDetail>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PAYMENT_DETAILS_TABLE)?;
        match table.get(order_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    // ========== Coupon assignments ==========

    /// Insert or update a coupon assignment
    pub fn upsert_coupon(
        &self,
        txn: &WriteTransaction,
        coupon: &CouponAssignment,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(COUPONS_TABLE)?;
        let bytes = serde_json::to_vec(coupon)?;
        table.insert(
            (coupon.user_id.as_str(), coupon.coupon_id.as_str()),
            bytes.as_slice(),
        )?;
        Ok(())
    }

    /// List a user's coupon assignments (read-only)
    pub fn list_coupons(&self, user_id: &str) -> StorageResult<Vec<CouponAssignment>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COUPONS_TABLE)?;
        Self::collect_coupons(&table, user_id)
    }

    /// List a user's coupon assignments within a write transaction
    pub fn list_coupons_txn(
        &self,
        txn: &WriteTransaction,
        user_id: &str,
    ) -> StorageResult<Vec<CouponAssignment>> {
        let table = txn.open_table(COUPONS_TABLE)?;
        Self::collect_coupons(&table, user_id)
    }

    fn collect_coupons(
        table: &impl ReadableTable<(&'static str, &'static str), &'static [u8]>,
        user_id: &str,
    ) -> StorageResult<Vec<CouponAssignment>> {
        let mut coupons = Vec::new();
        for result in table.range((user_id, "")..)? {
            let (key, value) = result?;
            if key.value().0 != user_id {
                break;
            }
            coupons.push(serde_json::from_slice::<CouponAssignment>(value.value())?);
        }
        Ok(coupons)
    }

    /// Consume a coupon: re-validate `is_active` and the validity
    /// window inside the transaction, then flip `is_active` to false.
    ///
    /// Returns `false` when the coupon was already consumed or out of
    /// window; the write transaction's single-writer guarantee makes
    /// this a compare-and-swap against concurrent checkouts.
    pub fn consume_coupon(
        &self,
        txn: &WriteTransaction,
        user_id: &str,
        coupon_id: &str,
        now: i64,
    ) -> StorageResult<bool> {
        let mut table = txn.open_table(COUPONS_TABLE)?;
        let mut coupon: CouponAssignment = match table.get((user_id, coupon_id))? {
            Some(guard) => serde_json::from_slice(guard.value())?,
            None => return Ok(false),
        };
        if !coupon.is_valid_at(now) {
            return Ok(false);
        }
        coupon.is_active = false;
        let bytes = serde_json::to_vec(&coupon)?;
        table.insert((user_id, coupon_id), bytes.as_slice())?;
        Ok(true)
    }

    // ========== Stored cards ==========

    /// Persist a reusable card on the user's profile
    pub fn store_card(&self, txn: &WriteTransaction, card: &StoredCard) -> StorageResult<()> {
        let mut table = txn.open_table(STORED_CARDS_TABLE)?;
        let bytes = serde_json::to_vec(card)?;
        table.insert((card.user_id.as_str(), card.id.as_str()), bytes.as_slice())?;
        Ok(())
    }

    /// List a user's stored cards (read-only)
    pub fn list_stored_cards(&self, user_id: &str) -> StorageResult<Vec<StoredCard>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STORED_CARDS_TABLE)?;
        let mut cards = Vec::new();
        for result in table.range((user_id, "")..)? {
            let (key, value) = result?;
            if key.value().0 != user_id {
                break;
            }
            cards.push(serde_json::from_slice::<StoredCard>(value.value())?);
        }
        Ok(cards)
    }
}

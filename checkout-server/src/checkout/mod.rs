//! Checkout orchestration subsystem
//!
//! The modules here cover the whole cart → order → payment →
//! fulfillment-state workflow:
//!
//! - `storage`: redb persistence for every checkout entity
//! - `money`: decimal arithmetic and monetary validation
//! - `pricing`: totals from the cart's price snapshot
//! - `coupon`: coupon resolution
//! - `payment`: per-method settlement strategies
//! - `manager`: the orchestrator tying it all together

pub mod coupon;
pub mod error;
pub mod manager;
pub mod money;
pub mod payment;
pub mod pricing;
pub mod storage;

pub use error::{CheckoutError, CheckoutResult};
pub use manager::CheckoutManager;
pub use storage::{CheckoutStorage, StorageError, StorageResult};

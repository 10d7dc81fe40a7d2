//! API routing module
//!
//! # Structure
//!
//! - [`health`] - health checks
//! - [`sessions`] - session registration
//! - [`catalog`] - product catalog management
//! - [`cart`] - cart line management
//! - [`coupons`] - coupon assignment and user profile reads
//! - [`checkout`] - the checkout operation
//! - [`orders`] - order reads and fulfillment updates

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod coupons;
pub mod health;
pub mod orders;
pub mod sessions;

use axum::Router;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

/// Assemble the full application router
pub fn create_router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(sessions::router())
        .merge(catalog::router())
        .merge(cart::router())
        .merge(coupons::router())
        .merge(checkout::router())
        .merge(orders::router())
        .with_state(state)
}

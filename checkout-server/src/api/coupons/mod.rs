//! Coupon and user profile API module
//!
//! # Routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/coupons | POST | Assign a coupon to a user |
//! | /api/users/{user_id}/coupons | GET | List a user's coupons |
//! | /api/users/{user_id}/cards | GET | List a user's stored cards |

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/coupons", post(handler::assign))
        .route("/api/users/{user_id}/coupons", get(handler::list_coupons))
        .route("/api/users/{user_id}/cards", get(handler::list_cards))
}

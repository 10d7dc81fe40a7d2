//! Checkout API module
//!
//! # Routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/checkout | POST | Run the checkout workflow |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/checkout", post(handler::checkout))
}

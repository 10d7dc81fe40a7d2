//! Health check routes
//!
//! # Routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /health | GET | Simple health check |
//! | /health/detailed | GET | Component-level health check |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Health routes - public, no session required
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/health", get(handler::health))
        .route("/health/detailed", get(handler::detailed_health))
}

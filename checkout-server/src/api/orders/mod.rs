//! Order API module
//!
//! # Routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/orders/{id} | GET | Full order read model |
//! | /api/orders/{id}/status | PUT | Advance fulfillment status |

mod handler;

use axum::{Router, routing::get, routing::put};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::update_status))
}

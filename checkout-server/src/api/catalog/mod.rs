//! Catalog API module
//!
//! # Routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/catalog | GET | List products |
//! | /api/catalog | POST | Register or update a product |
//! | /api/catalog/{id} | GET | Fetch one product |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/catalog", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::upsert))
        .route("/{id}", get(handler::get_by_id))
}

//! Cart API module
//!
//! # Routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/sessions/{session_id}/cart | GET | List the session's cart |
//! | /api/sessions/{session_id}/cart | POST | Add a cart line |
//! | /api/sessions/{session_id}/cart/{line_id} | PUT | Update a cart line |
//! | /api/sessions/{session_id}/cart/{line_id} | DELETE | Remove a cart line |

mod handler;

use axum::{Router, routing::get, routing::put};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/sessions/{session_id}/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::add))
        .route("/{line_id}", put(handler::update).delete(handler::remove))
}

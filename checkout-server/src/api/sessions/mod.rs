//! Session API module
//!
//! # Routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/sessions | POST | Register a session for a user |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/sessions", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/", post(handler::register))
}

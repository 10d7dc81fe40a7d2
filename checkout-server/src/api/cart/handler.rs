//! Cart API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};
use crate::utils::validation::validate_quantity;
use shared::checkout::{CartLine, CartLineInput, CartLineUpdate};

/// GET /api/sessions/:session_id/cart - list the cart
pub async fn list(
    State(state): State<ServerState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<Vec<CartLine>>> {
    let lines = state
        .checkout
        .list_cart(&session_id)
        .map_err(AppError::from)?;
    Ok(Json(lines))
}

/// POST /api/sessions/:session_id/cart - add a line
pub async fn add(
    State(state): State<ServerState>,
    Path(session_id): Path<String>,
    Json(payload): Json<CartLineInput>,
) -> AppResult<Json<CartLine>> {
    validate_quantity(payload.quantity)?;
    let line = state
        .checkout
        .add_cart_line(&session_id, payload)
        .map_err(AppError::from)?;
    Ok(Json(line))
}

/// PUT /api/sessions/:session_id/cart/:line_id - update a line
pub async fn update(
    State(state): State<ServerState>,
    Path((session_id, line_id)): Path<(String, String)>,
    Json(payload): Json<CartLineUpdate>,
) -> AppResult<Json<CartLine>> {
    if let Some(quantity) = payload.quantity {
        validate_quantity(quantity)?;
    }
    let line = state
        .checkout
        .update_cart_line(&session_id, &line_id, payload)
        .map_err(AppError::from)?;
    Ok(Json(line))
}

/// DELETE /api/sessions/:session_id/cart/:line_id - remove a line
pub async fn remove(
    State(state): State<ServerState>,
    Path((session_id, line_id)): Path<(String, String)>,
) -> AppResult<Json<bool>> {
    state
        .checkout
        .remove_cart_line(&session_id, &line_id)
        .map_err(AppError::from)?;
    Ok(Json(true))
}

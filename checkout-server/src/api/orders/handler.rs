//! Order API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};
use shared::checkout::{Order, OrderView, StatusUpdate};

/// GET /api/orders/:id - full order read model
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderView>> {
    let view = state.checkout.order_view(&id).map_err(AppError::from)?;
    Ok(Json(view))
}

/// PUT /api/orders/:id/status - advance fulfillment status
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<Order>> {
    let order = state
        .checkout
        .update_status(&id, &payload.status)
        .map_err(AppError::from)?;
    Ok(Json(order))
}

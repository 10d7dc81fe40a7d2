//! Coupon API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};
use crate::utils::validation::{MAX_SHORT_TEXT_LEN, validate_required_text};
use shared::checkout::{CouponAssignInput, CouponAssignment, StoredCard};

/// POST /api/coupons - grant a coupon assignment
pub async fn assign(
    State(state): State<ServerState>,
    Json(payload): Json<CouponAssignInput>,
) -> AppResult<Json<CouponAssignment>> {
    validate_required_text(&payload.user_id, "user_id", MAX_SHORT_TEXT_LEN)?;
    let assignment = state
        .checkout
        .assign_coupon(payload)
        .map_err(AppError::from)?;
    Ok(Json(assignment))
}

/// GET /api/users/:user_id/coupons - list coupon assignments
pub async fn list_coupons(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<CouponAssignment>>> {
    let coupons = state
        .checkout
        .list_coupons(&user_id)
        .map_err(AppError::from)?;
    Ok(Json(coupons))
}

/// GET /api/users/:user_id/cards - list stored cards
///
/// Card numbers never leave the server in full; the response is
/// redacted to the last four digits.
pub async fn list_cards(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<StoredCard>>> {
    let cards = state
        .checkout
        .list_stored_cards(&user_id)
        .map_err(AppError::from)?
        .into_iter()
        .map(|mut card| {
            let len = card.card_number.len();
            card.card_number = format!("****{}", &card.card_number[len.saturating_sub(4)..]);
            card
        })
        .collect();
    Ok(Json(cards))
}

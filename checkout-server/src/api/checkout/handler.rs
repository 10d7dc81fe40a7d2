//! Checkout API handler

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};
use crate::utils::validation::{MAX_SHORT_TEXT_LEN, validate_required_text};
use shared::checkout::{CheckoutRequest, CheckoutView};

/// POST /api/checkout - run the full checkout workflow
///
/// The workflow holds the storage write lock, so it runs on the
/// blocking pool rather than stalling the async executor.
pub async fn checkout(
    State(state): State<ServerState>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<CheckoutView>> {
    validate_required_text(&payload.session_id, "session_id", MAX_SHORT_TEXT_LEN)?;

    let manager = state.checkout.clone();
    let view = tokio::task::spawn_blocking(move || manager.checkout(payload))
        .await
        .map_err(|e| AppError::internal(format!("checkout task failed: {e}")))?
        .map_err(AppError::from)?;
    Ok(Json(view))
}

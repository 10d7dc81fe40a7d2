//! Session API handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};
use crate::utils::validation::{MAX_SHORT_TEXT_LEN, validate_required_text};
use shared::checkout::{SessionRegister, SessionView};

/// POST /api/sessions - register a new session
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<SessionRegister>,
) -> AppResult<Json<SessionView>> {
    validate_required_text(&payload.user_id, "user_id", MAX_SHORT_TEXT_LEN)?;
    let session = state
        .checkout
        .register_session(&payload.user_id)
        .map_err(AppError::from)?;
    Ok(Json(session))
}

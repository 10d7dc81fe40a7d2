//! Catalog API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::checkout::money;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use shared::checkout::ProductEntry;

/// GET /api/catalog - list every product
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ProductEntry>>> {
    let mut products = state.catalog.list();
    products.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(products))
}

/// GET /api/catalog/:id - fetch one product
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductEntry>> {
    let product = state
        .catalog
        .get(&id)
        .ok_or_else(|| AppError::not_found(format!("Product {} not found", id)))?;
    Ok(Json(product))
}

/// POST /api/catalog - register or update a product
pub async fn upsert(
    State(state): State<ServerState>,
    Json(payload): Json<ProductEntry>,
) -> AppResult<Json<ProductEntry>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    money::validate_unit_price(payload.unit_price).map_err(AppError::from)?;
    Ok(Json(state.catalog.upsert(payload)))
}

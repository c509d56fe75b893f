use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::{
    add_price, create_pack, list_active_ads, list_active_packs, save_ad, AdInput, PackView,
};
use crate::auth::StaffUser;
use crate::errors::AppError;
use crate::models::catalog::{AdRow, AdType, PackRow, PriceRow};
use crate::models::DbId;
use crate::state::AppState;

/// GET /api/v1/packs
pub async fn handle_list_packs(
    State(state): State<AppState>,
) -> Result<Json<Vec<PackView>>, AppError> {
    Ok(Json(list_active_packs(&state.db).await?))
}

#[derive(Debug, Deserialize)]
pub struct AdQuery {
    pub ad_type: Option<AdType>,
}

/// GET /api/v1/ads
pub async fn handle_list_ads(
    State(state): State<AppState>,
    Query(params): Query<AdQuery>,
) -> Result<Json<Vec<AdRow>>, AppError> {
    Ok(Json(list_active_ads(&state.db, params.ad_type).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreatePackRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// POST /api/v1/admin/packs
pub async fn handle_create_pack(
    State(state): State<AppState>,
    _staff: StaffUser,
    Json(req): Json<CreatePackRequest>,
) -> Result<(StatusCode, Json<PackRow>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    let pack = create_pack(
        &state.db,
        req.name.trim(),
        req.description.as_deref(),
        req.is_active,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(pack)))
}

#[derive(Debug, Deserialize)]
pub struct CreatePriceRequest {
    pub credits: i32,
    pub price_cents: i64,
}

/// POST /api/v1/admin/packs/:id/prices
pub async fn handle_create_price(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(pack_id): Path<DbId>,
    Json(req): Json<CreatePriceRequest>,
) -> Result<(StatusCode, Json<PriceRow>), AppError> {
    let price = add_price(&state.db, pack_id, req.credits, req.price_cents).await?;
    Ok((StatusCode::CREATED, Json(price)))
}

/// POST /api/v1/admin/ads
pub async fn handle_create_ad(
    State(state): State<AppState>,
    _staff: StaffUser,
    Json(input): Json<AdInput>,
) -> Result<(StatusCode, Json<AdRow>), AppError> {
    Ok((StatusCode::CREATED, Json(save_ad(&state.db, None, &input).await?)))
}

/// PUT /api/v1/admin/ads/:id
pub async fn handle_update_ad(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(id): Path<DbId>,
    Json(input): Json<AdInput>,
) -> Result<Json<AdRow>, AppError> {
    Ok(Json(save_ad(&state.db, Some(id), &input).await?))
}

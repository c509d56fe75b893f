use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use super::{
    create_scraping_setting, get_scraping_setting, update_scraping_setting,
    validate_general_settings, PublicSettings,
};
use crate::auth::StaffUser;
use crate::errors::AppError;
use crate::models::settings::{
    GeneralSettingsRow, GeneralSettingsUpdate, ScrapingSettingInput, ScrapingSettingRow,
};
use crate::models::DbId;
use crate::state::AppState;

/// GET /api/v1/settings
pub async fn handle_public_settings(
    State(state): State<AppState>,
) -> Result<Json<PublicSettings>, AppError> {
    let settings = state.store.general_settings().await?;
    Ok(Json(PublicSettings::from(&settings)))
}

/// GET /api/v1/admin/settings/general
pub async fn handle_get_general_settings(
    State(state): State<AppState>,
    _staff: StaffUser,
) -> Result<Json<GeneralSettingsRow>, AppError> {
    Ok(Json(state.store.general_settings().await?))
}

/// PUT /api/v1/admin/settings/general
pub async fn handle_update_general_settings(
    State(state): State<AppState>,
    _staff: StaffUser,
    Json(update): Json<GeneralSettingsUpdate>,
) -> Result<Json<GeneralSettingsRow>, AppError> {
    validate_general_settings(&update)?;
    let settings = state.store.update_general_settings(&update).await?;
    info!(
        ads_per_page = settings.ads_per_page,
        max_recent_search_terms = settings.max_recent_search_terms,
        credits_to_start_with = settings.credits_to_start_with,
        "General settings updated"
    );
    Ok(Json(settings))
}

/// GET /api/v1/admin/settings/scraping
pub async fn handle_get_scraping_setting(
    State(state): State<AppState>,
    _staff: StaffUser,
) -> Result<Json<Option<ScrapingSettingRow>>, AppError> {
    Ok(Json(get_scraping_setting(&state.db).await?))
}

/// POST /api/v1/admin/settings/scraping
pub async fn handle_create_scraping_setting(
    State(state): State<AppState>,
    _staff: StaffUser,
    Json(input): Json<ScrapingSettingInput>,
) -> Result<(StatusCode, Json<ScrapingSettingRow>), AppError> {
    let setting = create_scraping_setting(&state.db, &input).await?;
    Ok((StatusCode::CREATED, Json(setting)))
}

/// PUT /api/v1/admin/settings/scraping/:id
pub async fn handle_update_scraping_setting(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(id): Path<DbId>,
    Json(input): Json<ScrapingSettingInput>,
) -> Result<Json<ScrapingSettingRow>, AppError> {
    Ok(Json(update_scraping_setting(&state.db, id, &input).await?))
}

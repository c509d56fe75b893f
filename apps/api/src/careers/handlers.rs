use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::{
    add_translation, create_career, list_careers, recommend_career, recommended_careers,
    CareerView,
};
use crate::accounts::current_candidate;
use crate::auth::{AuthUser, StaffUser};
use crate::errors::{is_foreign_key_violation, AppError};
use crate::models::career::{CandidateCareerRow, CareerRow, CareerTranslationRow};
use crate::models::DbId;
use crate::state::AppState;

/// GET /api/v1/careers
pub async fn handle_list_careers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CareerView>>, AppError> {
    Ok(Json(list_careers(&state.db).await?))
}

/// GET /api/v1/careers/recommended
pub async fn handle_recommended_careers(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<CareerView>>, AppError> {
    let candidate = current_candidate(state.store.as_ref(), &user).await?;
    let limit = state.store.general_settings().await?.num_of_careers_to_generate;
    Ok(Json(
        recommended_careers(&state.db, candidate.id, limit).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct CreateCareerRequest {
    pub group_identifier: String,
}

/// POST /api/v1/admin/careers
pub async fn handle_create_career(
    State(state): State<AppState>,
    _staff: StaffUser,
    Json(req): Json<CreateCareerRequest>,
) -> Result<(StatusCode, Json<CareerRow>), AppError> {
    let group = req.group_identifier.trim();
    if group.is_empty() {
        return Err(AppError::Validation("group_identifier is required".into()));
    }
    Ok((StatusCode::CREATED, Json(create_career(&state.db, group).await?)))
}

#[derive(Debug, Deserialize)]
pub struct CreateTranslationRequest {
    pub language: String,
    pub title: String,
    #[serde(default)]
    pub transition_path: String,
}

/// POST /api/v1/admin/careers/:id/translations
pub async fn handle_create_translation(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(career_id): Path<DbId>,
    Json(req): Json<CreateTranslationRequest>,
) -> Result<(StatusCode, Json<CareerTranslationRow>), AppError> {
    if state.store.get_career(career_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Career {career_id} not found")));
    }
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("title is required".into()));
    }
    let row = add_translation(
        &state.db,
        career_id,
        &req.language,
        req.title.trim(),
        &req.transition_path,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[derive(Debug, Deserialize)]
pub struct RecommendCareerRequest {
    pub career_id: DbId,
}

/// POST /api/v1/admin/candidates/:id/careers
pub async fn handle_recommend_career(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(candidate_id): Path<DbId>,
    Json(req): Json<RecommendCareerRequest>,
) -> Result<(StatusCode, Json<CandidateCareerRow>), AppError> {
    if state.store.get_career(req.career_id).await?.is_none() {
        return Err(AppError::Validation(format!(
            "Career {} does not exist",
            req.career_id
        )));
    }
    let row = recommend_career(&state.db, candidate_id, req.career_id)
        .await
        .map_err(|e| match e {
            AppError::Database(ref db) if is_foreign_key_violation(db) => {
                AppError::NotFound(format!("Candidate {candidate_id} not found"))
            }
            other => other,
        })?;
    Ok((StatusCode::CREATED, Json(row)))
}

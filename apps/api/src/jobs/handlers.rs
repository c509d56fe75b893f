use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::export::export_jobs;
use super::import::{import_jobs, ImportReport};
use super::queries::{self, DEFAULT_PAGE_SIZE};
use super::search_terms::{
    dismiss_search_term, normalize_search_term, recent_search_terms, record_search_term,
};
use super::views::JobView;
use crate::accounts::current_candidate;
use crate::auth::{AuthUser, StaffUser};
use crate::errors::AppError;
use crate::models::job::{JobRow, JobSearchRow, SearchTermRow};
use crate::models::DbId;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

async fn existing_job(state: &AppState, id: DbId) -> Result<JobRow, AppError> {
    state
        .store
        .get_job(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

async fn annotate(
    state: &AppState,
    candidate_id: DbId,
    jobs: Vec<JobRow>,
) -> Result<Vec<JobView>, AppError> {
    let ids: Vec<DbId> = jobs.iter().map(|j| j.id).collect();
    let annotations = queries::load_annotations(&state.db, candidate_id, &ids).await?;
    Ok(jobs
        .into_iter()
        .map(|job| JobView::new(job, &annotations))
        .collect())
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<JobListQuery>,
) -> Result<Json<Vec<JobView>>, AppError> {
    let candidate = current_candidate(state.store.as_ref(), &user).await?;
    let jobs = queries::list_jobs(
        &state.db,
        params.search.as_deref(),
        params.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        params.offset.unwrap_or(0),
    )
    .await?;

    if let Some(term) = params.search.as_deref().and_then(normalize_search_term) {
        if let Err(e) = record_search_term(&state.db, candidate.id, &term).await {
            warn!(candidate_id = candidate.id, "Failed to record search term: {e}");
        }
    }
    Ok(Json(annotate(&state, candidate.id, jobs).await?))
}

/// GET /api/v1/search-terms
pub async fn handle_recent_search_terms(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<SearchTermRow>>, AppError> {
    let candidate = current_candidate(state.store.as_ref(), &user).await?;
    let limit = state.store.general_settings().await?.max_recent_search_terms;
    Ok(Json(
        recent_search_terms(&state.db, candidate.id, limit).await?,
    ))
}

/// DELETE /api/v1/search-terms/:id
pub async fn handle_dismiss_search_term(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> Result<StatusCode, AppError> {
    let candidate = current_candidate(state.store.as_ref(), &user).await?;
    if !dismiss_search_term(&state.db, candidate.id, id).await? {
        return Err(AppError::NotFound(format!("Search term {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> Result<Json<JobView>, AppError> {
    let candidate = current_candidate(state.store.as_ref(), &user).await?;
    let job = existing_job(&state, id).await?;
    let mut views = annotate(&state, candidate.id, vec![job]).await?;
    views
        .pop()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

/// GET /api/v1/favorites
pub async fn handle_list_favorites(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<JobView>>, AppError> {
    let candidate = current_candidate(state.store.as_ref(), &user).await?;
    let jobs = queries::list_favorite_jobs(&state.db, candidate.id).await?;
    Ok(Json(annotate(&state, candidate.id, jobs).await?))
}

/// PUT /api/v1/jobs/:id/favorite
pub async fn handle_add_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> Result<StatusCode, AppError> {
    let candidate = current_candidate(state.store.as_ref(), &user).await?;
    existing_job(&state, id).await?;
    queries::add_favorite(&state.db, candidate.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/jobs/:id/favorite
pub async fn handle_remove_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> Result<StatusCode, AppError> {
    let candidate = current_candidate(state.store.as_ref(), &user).await?;
    if !queries::remove_favorite(&state.db, candidate.id, id).await? {
        return Err(AppError::NotFound(format!("Job {id} is not a favorite")));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
pub struct ClickResponse {
    pub job_id: DbId,
    pub click_count: i64,
}

/// POST /api/v1/jobs/:id/click
pub async fn handle_record_click(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> Result<Json<ClickResponse>, AppError> {
    let candidate = current_candidate(state.store.as_ref(), &user).await?;
    existing_job(&state, id).await?;
    let click_count = queries::record_click(&state.db, candidate.id, id).await?;
    Ok(Json(ClickResponse {
        job_id: id,
        click_count,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub cv_id: DbId,
}

/// POST /api/v1/jobs/:id/apply
pub async fn handle_mark_applied(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(req): Json<ApplyRequest>,
) -> Result<Json<JobSearchRow>, AppError> {
    let candidate = current_candidate(state.store.as_ref(), &user).await?;
    let search = queries::mark_applied(&state.db, candidate.id, req.cv_id, id).await?;
    Ok(Json(search))
}

/// POST /api/v1/admin/jobs/import
/// Body is the raw CSV file.
pub async fn handle_import_jobs(
    State(state): State<AppState>,
    _staff: StaffUser,
    body: Bytes,
) -> Result<Json<ImportReport>, AppError> {
    if body.is_empty() {
        return Err(AppError::Validation("CSV body is empty".into()));
    }
    let report = import_jobs(state.store.as_ref(), body.as_ref()).await?;
    Ok(Json(report))
}

/// GET /api/v1/admin/jobs/export
pub async fn handle_export_jobs(
    State(state): State<AppState>,
    _staff: StaffUser,
) -> Result<impl IntoResponse, AppError> {
    let jobs = state.store.list_all_jobs().await?;
    let csv = export_jobs(&jobs)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"jobs.csv\""),
        ],
        csv,
    ))
}

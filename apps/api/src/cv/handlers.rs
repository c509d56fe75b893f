use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::lifecycle::{create_cv, delete_cv, save_cv_data};
use super::template_defaults::default_template;
use super::views::{CvDataView, CvRelations, CvView, TemplateView};
use crate::accounts::current_candidate;
use crate::auth::{AuthUser, StaffUser};
use crate::careers::CareerView;
use crate::errors::AppError;
use crate::jobs::views::{JobAnnotations, JobView};
use crate::models::cv::{AbstractTemplateRow, CvDataInput, CvRow, CvType, NewCv};
use crate::models::DbId;
use crate::state::AppState;

/// Loads a CV owned by the caller. Other candidates' CVs read as missing.
async fn owned_cv(state: &AppState, user: &AuthUser, cv_id: DbId) -> Result<CvRow, AppError> {
    let candidate = current_candidate(state.store.as_ref(), user).await?;
    state
        .store
        .get_cv(cv_id)
        .await?
        .filter(|cv| cv.candidate_id == candidate.id)
        .ok_or_else(|| AppError::NotFound(format!("CV {cv_id} not found")))
}

async fn load_cv_view(state: &AppState, cv: CvRow) -> Result<CvView, AppError> {
    let store = state.store.as_ref();
    let mut related = CvRelations {
        data: store.get_cv_data(cv.id).await?,
        ..Default::default()
    };

    if let Some(job_id) = cv.job_id {
        related.job = store
            .get_job(job_id)
            .await?
            .map(|job| JobView::new(job, &JobAnnotations::default()));
    }
    if let Some(career_id) = cv.career_id {
        if let Some(career) = store.get_career(career_id).await? {
            let translations = store.list_career_translations(career_id).await?;
            related.career = Some(CareerView::new(career, translations));
        }
    }
    if let Some(template_id) = cv.template_id {
        if let Some(template) = store.get_template(template_id).await? {
            let design = match template.abstract_template_id {
                Some(id) => store.get_abstract_template(id).await?,
                None => None,
            };
            related.template = Some(TemplateView::new(template, design.as_ref()));
        }
    }

    Ok(CvView::new(cv, related, state.cv.detector.as_ref()))
}

/// GET /api/v1/cvs
pub async fn handle_list_cvs(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<CvView>>, AppError> {
    let candidate = current_candidate(state.store.as_ref(), &user).await?;
    let cvs = state.store.list_cvs(candidate.id).await?;

    let mut views = Vec::with_capacity(cvs.len());
    for cv in cvs {
        views.push(load_cv_view(&state, cv).await?);
    }
    Ok(Json(views))
}

#[derive(Debug, Deserialize)]
pub struct CreateCvRequest {
    pub cv_type: CvType,
    pub name: Option<String>,
    pub original_file: Option<String>,
    pub job_id: Option<DbId>,
    pub career_id: Option<DbId>,
    /// Design to instantiate instead of the default one.
    pub abstract_template_id: Option<DbId>,
}

/// POST /api/v1/cvs
pub async fn handle_create_cv(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateCvRequest>,
) -> Result<(StatusCode, Json<CvView>), AppError> {
    let candidate = current_candidate(state.store.as_ref(), &user).await?;
    let store = state.store.as_ref();

    if let Some(job_id) = req.job_id {
        if store.get_job(job_id).await?.is_none() {
            return Err(AppError::Validation(format!("Job {job_id} does not exist")));
        }
    }
    if let Some(career_id) = req.career_id {
        if store.get_career(career_id).await?.is_none() {
            return Err(AppError::Validation(format!(
                "Career {career_id} does not exist"
            )));
        }
    }

    let template_id = match req.abstract_template_id {
        Some(design_id) => {
            let design = store.get_abstract_template(design_id).await?.ok_or_else(|| {
                AppError::Validation(format!("Template design {design_id} does not exist"))
            })?;
            Some(store.insert_template(&default_template(design.id)).await?.id)
        }
        None => None,
    };

    let cv = create_cv(
        &state.cv,
        &NewCv {
            candidate_id: candidate.id,
            cv_type: req.cv_type,
            name: req.name.filter(|n| !n.trim().is_empty()),
            original_file: req.original_file,
            template_id,
            job_id: req.job_id,
            career_id: req.career_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(load_cv_view(&state, cv).await?)))
}

/// GET /api/v1/cvs/:id
pub async fn handle_get_cv(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> Result<Json<CvView>, AppError> {
    let cv = owned_cv(&state, &user, id).await?;
    Ok(Json(load_cv_view(&state, cv).await?))
}

/// DELETE /api/v1/cvs/:id
pub async fn handle_delete_cv(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> Result<StatusCode, AppError> {
    owned_cv(&state, &user, id).await?;
    delete_cv(&state.cv, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/cvs/:id/data
pub async fn handle_save_cv_data(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(payload): Json<Value>,
) -> Result<Json<CvDataView>, AppError> {
    owned_cv(&state, &user, id).await?;
    let input = CvDataInput::from_payload(payload)
        .map_err(|e| AppError::Validation(format!("Invalid CV data: {e}")))?;
    let data = save_cv_data(&state.cv, id, &input).await?;
    Ok(Json(CvDataView::from(data)))
}

/// GET /api/v1/templates
pub async fn handle_list_abstract_templates(
    State(state): State<AppState>,
) -> Result<Json<Vec<AbstractTemplateRow>>, AppError> {
    Ok(Json(state.store.list_abstract_templates().await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateAbstractTemplateRequest {
    pub name: String,
    pub reference: Option<String>,
    pub image: Option<String>,
}

/// POST /api/v1/admin/templates
pub async fn handle_create_abstract_template(
    State(state): State<AppState>,
    _staff: StaffUser,
    Json(req): Json<CreateAbstractTemplateRequest>,
) -> Result<(StatusCode, Json<AbstractTemplateRow>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("Template name is required".into()));
    }
    let row = state
        .store
        .insert_abstract_template(&req.name, req.reference.as_deref(), req.image.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::queries::{self, QuestionInput};
use super::validation::{valid_options, validate_response, OptionSlots, ResponseInput};
use super::views::{AnswerSetView, QuestionView, ResponseView};
use crate::accounts::current_candidate;
use crate::auth::{AuthUser, StaffUser};
use crate::errors::AppError;
use crate::models::career::LanguageRow;
use crate::models::survey::{AnswerOptionRow, AnswerSetRow, QuestionRow};
use crate::models::DbId;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LanguageQuery {
    pub language: Option<String>,
}

async fn existing_question(state: &AppState, id: DbId) -> Result<QuestionRow, AppError> {
    queries::get_question(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Question {id} not found")))
}

async fn question_options(
    state: &AppState,
    question: &QuestionRow,
) -> Result<Vec<AnswerOptionRow>, AppError> {
    match question.answer_set_id {
        Some(set_id) => queries::options_for_sets(&state.db, &[set_id]).await,
        None => Ok(Vec::new()),
    }
}

async fn single_view(state: &AppState, question: QuestionRow) -> Result<QuestionView, AppError> {
    let id = question.id;
    queries::question_views(&state.db, vec![question])
        .await?
        .pop()
        .ok_or_else(|| AppError::NotFound(format!("Question {id} not found")))
}

/// GET /api/v1/languages
pub async fn handle_list_languages(
    State(state): State<AppState>,
) -> Result<Json<Vec<LanguageRow>>, AppError> {
    Ok(Json(queries::list_languages(&state.db).await?))
}

/// GET /api/v1/answer-sets
pub async fn handle_list_answer_sets(
    State(state): State<AppState>,
    Query(params): Query<LanguageQuery>,
) -> Result<Json<Vec<AnswerSetView>>, AppError> {
    Ok(Json(
        queries::list_answer_sets(&state.db, params.language.as_deref()).await?,
    ))
}

/// GET /api/v1/questions
pub async fn handle_list_questions(
    State(state): State<AppState>,
    Query(params): Query<LanguageQuery>,
) -> Result<Json<Vec<QuestionView>>, AppError> {
    let questions = queries::list_questions(&state.db, params.language.as_deref()).await?;
    Ok(Json(queries::question_views(&state.db, questions).await?))
}

/// GET /api/v1/questions/:id
pub async fn handle_get_question(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> Result<Json<QuestionView>, AppError> {
    let question = existing_question(&state, id).await?;
    Ok(Json(single_view(&state, question).await?))
}

/// POST /api/v1/questions/:id/responses
pub async fn handle_submit_response(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ResponseInput>,
) -> Result<(StatusCode, Json<ResponseView>), AppError> {
    let candidate = current_candidate(state.store.as_ref(), &user).await?;
    let question = existing_question(&state, id).await?;
    let options = question_options(&state, &question).await?;
    validate_response(&question, &options, &input)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (response, selected) =
        queries::insert_response(&state.db, candidate.id, question.id, &input).await?;
    let question = single_view(&state, question).await?;
    Ok((
        StatusCode::CREATED,
        Json(ResponseView::new(response, question, selected)),
    ))
}

/// GET /api/v1/responses
pub async fn handle_list_responses(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ResponseView>>, AppError> {
    let candidate = current_candidate(state.store.as_ref(), &user).await?;
    Ok(Json(queries::list_responses(&state.db, candidate.id).await?))
}

/// POST /api/v1/admin/questions
pub async fn handle_create_question(
    State(state): State<AppState>,
    _staff: StaffUser,
    Json(input): Json<QuestionInput>,
) -> Result<(StatusCode, Json<QuestionView>), AppError> {
    let question = queries::save_question(&state.db, None, &input).await?;
    Ok((StatusCode::CREATED, Json(single_view(&state, question).await?)))
}

/// PUT /api/v1/admin/questions/:id
pub async fn handle_update_question(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(id): Path<DbId>,
    Json(input): Json<QuestionInput>,
) -> Result<Json<QuestionView>, AppError> {
    existing_question(&state, id).await?;
    let question = queries::save_question(&state.db, Some(id), &input).await?;
    Ok(Json(single_view(&state, question).await?))
}

/// GET /api/v1/admin/questions/:id/options
/// The options a response to this question may select, and in which slot.
pub async fn handle_question_options(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(id): Path<DbId>,
) -> Result<Json<OptionSlots>, AppError> {
    let question = existing_question(&state, id).await?;
    let options = question_options(&state, &question).await?;
    Ok(Json(valid_options(&question, &options)))
}

/// GET /api/v1/admin/group-identifiers
pub async fn handle_list_group_identifiers(
    State(state): State<AppState>,
    _staff: StaffUser,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(queries::list_group_identifiers(&state.db).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateAnswerSetRequest {
    pub language: String,
    pub name: String,
}

/// POST /api/v1/admin/answer-sets
pub async fn handle_create_answer_set(
    State(state): State<AppState>,
    _staff: StaffUser,
    Json(req): Json<CreateAnswerSetRequest>,
) -> Result<(StatusCode, Json<AnswerSetRow>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    let set = queries::create_answer_set(&state.db, &req.language, req.name.trim()).await?;
    Ok((StatusCode::CREATED, Json(set)))
}

#[derive(Debug, Deserialize)]
pub struct CreateOptionRequest {
    pub text: String,
}

/// POST /api/v1/admin/answer-sets/:id/options
pub async fn handle_create_answer_option(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(set_id): Path<DbId>,
    Json(req): Json<CreateOptionRequest>,
) -> Result<(StatusCode, Json<AnswerOptionRow>), AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("text is required".into()));
    }
    let option = queries::add_answer_option(&state.db, set_id, req.text.trim()).await?;
    Ok((StatusCode::CREATED, Json(option)))
}

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{current_candidate, login, register_user, update_profile, RegisterRequest};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::candidate::{CandidateRow, CandidateUpdate};
use crate::models::user::UserRow;
use crate::models::DbId;
use crate::state::AppState;

#[derive(Serialize)]
pub struct UserView {
    pub id: DbId,
    pub username: String,
    pub email: String,
}

impl From<&UserRow> for UserView {
    fn from(user: &UserRow) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct CandidateView {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub credits: f64,
    pub profile_picture: Option<String>,
    pub user: Option<UserView>,
    pub updated_at: DateTime<Utc>,
}

impl CandidateView {
    fn new(candidate: CandidateRow, user: Option<&UserRow>) -> Self {
        Self {
            id: candidate.id,
            first_name: candidate.first_name,
            last_name: candidate.last_name,
            phone: candidate.phone,
            age: candidate.age,
            city: candidate.city,
            country: candidate.country,
            credits: candidate.credits,
            profile_picture: candidate.profile_picture,
            user: user.map(UserView::from),
            updated_at: candidate.updated_at,
        }
    }
}

/// POST /api/v1/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<CandidateView>), AppError> {
    let (user, candidate) = register_user(state.store.as_ref(), &req).await?;
    Ok((
        StatusCode::CREATED,
        Json(CandidateView::new(candidate, Some(&user))),
    ))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = login(
        state.store.as_ref(),
        &req.username,
        &req.password,
        &state.config.jwt_secret,
        state.config.jwt_expiry_mins,
    )
    .await?;
    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "Bearer",
        expires_in: state.config.jwt_expiry_mins * 60,
    }))
}

/// GET /api/v1/me
pub async fn handle_get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<CandidateView>, AppError> {
    let candidate = current_candidate(state.store.as_ref(), &user).await?;
    let account = state.store.get_user(user.user_id).await?;
    Ok(Json(CandidateView::new(candidate, account.as_ref())))
}

/// PATCH /api/v1/me
pub async fn handle_update_me(
    State(state): State<AppState>,
    user: AuthUser,
    Json(update): Json<CandidateUpdate>,
) -> Result<Json<CandidateView>, AppError> {
    let candidate = current_candidate(state.store.as_ref(), &user).await?;
    let updated = update_profile(state.store.as_ref(), candidate.id, &update).await?;
    let account = state.store.get_user(user.user_id).await?;
    Ok(Json(CandidateView::new(updated, account.as_ref())))
}

//! JWT authentication extractors for axum handlers.

use axum::async_trait;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;

use super::jwt::validate_token;
use crate::errors::AppError;
use crate::models::DbId;
use crate::state::AppState;

/// Authenticated caller, taken from `Authorization: Bearer <token>`.
///
/// Browsers cannot set headers on websocket upgrades, so a `?token=` query
/// parameter is accepted as a fallback.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub staff: bool,
}

/// Guard for staff-only routes: the caller's token carries the staff flag.
#[derive(Debug, Clone, Copy)]
pub struct StaffUser;

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

fn bearer_token(parts: &Parts) -> Result<String, AppError> {
    if let Some(header) = parts.headers.get("authorization") {
        let value = header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Malformed Authorization header".into()))?;
        return value
            .strip_prefix("Bearer ")
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::Unauthorized(
                    "Invalid Authorization format. Expected: Bearer <token>".into(),
                )
            });
    }

    Query::<TokenQuery>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(q)| q.token)
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = validate_token(&token, &state.config.jwt_secret)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

        Ok(AuthUser {
            user_id: claims.sub,
            staff: claims.staff,
        })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for StaffUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.staff {
            return Err(AppError::Forbidden);
        }
        Ok(StaffUser)
    }
}

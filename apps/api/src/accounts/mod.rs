//! User registration, login and the candidate profile.

use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::candidate::{CandidateRow, CandidateUpdate};
use crate::models::user::{NewUser, UserRow};
use crate::models::DbId;
use crate::store::Store;

pub mod handlers;

const PROFILE_PICTURE_EXTENSIONS: [&str; 3] = [".png", ".jpg", ".jpeg"];

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 150, message = "Username must be 3 to 150 characters."))]
    pub username: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    /// Absent for accounts created through a social login.
    pub password: Option<String>,
}

/// Creates the user, its profile and its candidate record, then grants the
/// configured starting credits.
///
/// Accounts without a password come from social login and are verified
/// from the start.
pub async fn register_user(
    store: &dyn Store,
    req: &RegisterRequest,
) -> Result<(UserRow, CandidateRow), AppError> {
    req.validate()?;

    let password_hash = match req.password.as_deref() {
        Some(password) => {
            validate_password_strength(password).map_err(AppError::Validation)?;
            Some(
                hash_password(password)
                    .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {e}")))?,
            )
        }
        None => None,
    };

    let user = store
        .create_user(&NewUser {
            username: req.username.clone(),
            email: req.email.clone(),
            password_hash,
            is_staff: false,
        })
        .await?;

    store
        .create_user_profile(user.id, !user.has_usable_password())
        .await?;
    let mut candidate = store.get_or_create_candidate(user.id).await?;

    let starting = store.general_settings().await?.credits_to_start_with;
    if starting > 0 {
        candidate = store.add_credits(candidate.id, f64::from(starting)).await?;
    }

    info!(
        user_id = user.id,
        candidate_id = candidate.id,
        credits = candidate.credits,
        "User registered"
    );
    Ok((user, candidate))
}

/// Checks the credentials and issues an access token.
pub async fn login(
    store: &dyn Store,
    username: &str,
    password: &str,
    jwt_secret: &str,
    expiry_mins: i64,
) -> Result<String, AppError> {
    let invalid = || AppError::Unauthorized("Invalid username or password".into());

    let user = store
        .find_user_by_username(username)
        .await?
        .ok_or_else(invalid)?;
    let Some(hash) = user.password_hash.as_deref().filter(|h| !h.is_empty()) else {
        return Err(invalid());
    };

    let verified = verify_password(password, hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("stored password hash unreadable: {e}")))?;
    if !verified {
        return Err(invalid());
    }

    generate_token(user.id, user.is_staff, jwt_secret, expiry_mins)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("token generation failed: {e}")))
}

/// The caller's candidate record, created on first use.
pub async fn current_candidate(store: &dyn Store, user: &AuthUser) -> Result<CandidateRow, AppError> {
    store.get_or_create_candidate(user.user_id).await
}

pub fn validate_profile_picture(path: &str) -> Result<(), AppError> {
    let lower = path.to_lowercase();
    if PROFILE_PICTURE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(ext))
    {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Invalid file type. Only PNG, JPG, and JPEG are allowed.".into(),
        ))
    }
}

pub async fn update_profile(
    store: &dyn Store,
    candidate_id: DbId,
    update: &CandidateUpdate,
) -> Result<CandidateRow, AppError> {
    if let Some(picture) = update.profile_picture.as_deref() {
        validate_profile_picture(picture)?;
    }
    store.update_candidate(candidate_id, update).await
}

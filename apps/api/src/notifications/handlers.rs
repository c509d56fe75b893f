use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{candidate_user_id, create_notification, list_notifications, mark_viewed};
use crate::accounts::current_candidate;
use crate::auth::{AuthUser, StaffUser};
use crate::errors::AppError;
use crate::models::notification::NotificationRow;
use crate::models::DbId;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread: bool,
}

/// GET /api/v1/notifications
pub async fn handle_list_notifications(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<NotificationQuery>,
) -> Result<Json<Vec<NotificationRow>>, AppError> {
    let candidate = current_candidate(state.store.as_ref(), &user).await?;
    Ok(Json(
        list_notifications(&state.db, candidate.id, params.unread).await?,
    ))
}

/// POST /api/v1/notifications/:id/viewed
pub async fn handle_mark_viewed(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> Result<Json<NotificationRow>, AppError> {
    let candidate = current_candidate(state.store.as_ref(), &user).await?;
    Ok(Json(mark_viewed(&state.db, candidate.id, id).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateNotificationRequest {
    pub candidate_id: DbId,
    pub job_id: Option<DbId>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedNotification {
    pub notification: NotificationRow,
    /// Number of open sockets the message was pushed to.
    pub delivered: usize,
}

/// POST /api/v1/admin/notifications
pub async fn handle_create_notification(
    State(state): State<AppState>,
    _staff: StaffUser,
    Json(req): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<CreatedNotification>), AppError> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(AppError::Validation("message is required".into()));
    }
    let user_id = candidate_user_id(&state.db, req.candidate_id).await?;
    let notification =
        create_notification(&state.db, req.candidate_id, req.job_id, message).await?;

    let delivered = match user_id {
        Some(user_id) => state.ws_manager.notify_user(user_id, message).await,
        None => 0,
    };
    info!(
        notification_id = notification.id,
        candidate_id = req.candidate_id,
        delivered,
        "Notification created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreatedNotification {
            notification,
            delivered,
        }),
    ))
}

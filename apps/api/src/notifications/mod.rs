//! Persisted candidate notifications. Creating one also pushes it to the
//! candidate's open sockets.

use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::notification::NotificationRow;
use crate::models::DbId;

pub mod handlers;

pub async fn list_notifications(
    db: &PgPool,
    candidate_id: DbId,
    unread_only: bool,
) -> Result<Vec<NotificationRow>, AppError> {
    Ok(sqlx::query_as::<_, NotificationRow>(
        r#"
        SELECT * FROM notifications
        WHERE candidate_id = $1 AND (NOT $2 OR is_viewed = FALSE)
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(candidate_id)
    .bind(unread_only)
    .fetch_all(db)
    .await?)
}

pub async fn mark_viewed(
    db: &PgPool,
    candidate_id: DbId,
    id: DbId,
) -> Result<NotificationRow, AppError> {
    sqlx::query_as::<_, NotificationRow>(
        r#"
        UPDATE notifications SET is_viewed = TRUE
        WHERE id = $1 AND candidate_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(candidate_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Notification {id} not found")))
}

pub async fn create_notification(
    db: &PgPool,
    candidate_id: DbId,
    job_id: Option<DbId>,
    message: &str,
) -> Result<NotificationRow, AppError> {
    Ok(sqlx::query_as::<_, NotificationRow>(
        r#"
        INSERT INTO notifications (candidate_id, job_id, message)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(candidate_id)
    .bind(job_id)
    .bind(message)
    .fetch_one(db)
    .await?)
}

/// The account behind a candidate, used to address its sockets.
pub async fn candidate_user_id(db: &PgPool, candidate_id: DbId) -> Result<Option<DbId>, AppError> {
    let row: Option<(Option<DbId>,)> =
        sqlx::query_as("SELECT user_id FROM candidates WHERE id = $1")
            .bind(candidate_id)
            .fetch_optional(db)
            .await?;
    match row {
        Some((user_id,)) => Ok(user_id),
        None => Err(AppError::NotFound(format!(
            "Candidate {candidate_id} not found"
        ))),
    }
}

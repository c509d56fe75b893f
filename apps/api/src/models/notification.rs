use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::DbId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NotificationRow {
    pub id: DbId,
    pub candidate_id: DbId,
    pub job_id: Option<DbId>,
    pub message: String,
    pub is_viewed: bool,
    pub created_at: DateTime<Utc>,
}

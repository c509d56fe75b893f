use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::DbId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub credits: f64,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of the candidate profile. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub profile_picture: Option<String>,
}

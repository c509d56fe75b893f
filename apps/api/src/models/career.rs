use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::DbId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LanguageRow {
    pub id: DbId,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CareerRow {
    pub id: DbId,
    pub group_identifier: String,
}

/// A career translation joined with its language code.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CareerTranslationRow {
    pub id: DbId,
    pub career_id: DbId,
    pub language_id: DbId,
    pub language_code: String,
    pub title: String,
    pub transition_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateCareerRow {
    pub id: DbId,
    pub candidate_id: DbId,
    pub career_id: DbId,
    pub created_at: DateTime<Utc>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::DbId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PackRow {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PriceRow {
    pub id: DbId,
    pub pack_id: DbId,
    pub credits: i32,
    pub price_cents: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdType {
    InTop,
    InJobs,
    InLoading,
}

impl AdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdType::InTop => "in_top",
            AdType::InJobs => "in_jobs",
            AdType::InLoading => "in_loading",
        }
    }

    /// Slot types that may hold a single active ad at a time.
    pub fn is_exclusive(&self) -> bool {
        matches!(self, AdType::InTop | AdType::InLoading)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdRow {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub original_url: String,
    pub background: Option<String>,
    pub is_active: bool,
    pub ad_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

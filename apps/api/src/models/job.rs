use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use super::DbId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: DbId,
    pub title: Option<String>,
    pub description: String,
    pub requirements: Option<Value>,
    pub company_name: Option<String>,
    pub company_logo: Option<String>,
    pub company_size: Option<i32>,
    pub location: Option<String>,
    pub linkedin_profiles: Option<Value>,
    pub employment_type: Option<String>,
    pub original_url: String,
    pub salary_range: Option<String>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub benefits: Option<Value>,
    pub skills_required: Option<Value>,
    pub posted_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub industry: Option<String>,
    pub job_type: String,
    pub job_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable job fields, shared by CSV import and in-place updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobInput {
    pub title: Option<String>,
    pub description: String,
    pub requirements: Option<Value>,
    pub company_name: Option<String>,
    pub company_logo: Option<String>,
    pub company_size: Option<i32>,
    pub location: Option<String>,
    pub linkedin_profiles: Option<Value>,
    pub employment_type: Option<String>,
    pub original_url: String,
    pub salary_range: Option<String>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub benefits: Option<Value>,
    pub skills_required: Option<Value>,
    pub posted_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub industry: Option<String>,
    pub job_type: String,
    pub job_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobSearchRow {
    pub id: DbId,
    pub cv_id: DbId,
    pub job_id: DbId,
    pub similarity_score: f64,
    pub search_date: DateTime<Utc>,
    pub last_scored_at: Option<DateTime<Utc>>,
    pub is_applied: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SearchTermRow {
    pub id: DbId,
    pub term: String,
    pub last_searched_at: DateTime<Utc>,
}

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::models::job::JobRow;
use crate::models::DbId;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CvScore {
    pub cv_id: DbId,
    pub similarity_score: f64,
}

/// Per-request facts about the caller's relationship to each listed job.
#[derive(Debug, Default)]
pub struct JobAnnotations {
    pub similarity_scores: HashMap<DbId, Vec<CvScore>>,
    pub favorites: HashSet<DbId>,
    pub applied: HashSet<DbId>,
    pub click_counts: HashMap<DbId, i64>,
}

#[derive(Debug, Serialize)]
pub struct JobView {
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
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub benefits: Option<Value>,
    pub skills_required: Option<Value>,
    pub posted_date: Option<NaiveDate>,
    pub industry: Option<String>,
    pub job_type: String,
    pub similarity_scores: Vec<CvScore>,
    /// `true` for favorites, `null` otherwise.
    pub is_favorite: Option<bool>,
    pub is_applied: bool,
    pub click_count: i64,
    pub is_ad: bool,
}

impl JobView {
    pub fn new(job: JobRow, annotations: &JobAnnotations) -> Self {
        let id = job.id;
        Self {
            id,
            title: job.title,
            description: job.description,
            requirements: job.requirements,
            company_name: job.company_name,
            company_logo: job.company_logo,
            company_size: job.company_size,
            location: job.location,
            linkedin_profiles: job.linkedin_profiles,
            employment_type: job.employment_type,
            original_url: job.original_url,
            min_salary: job.min_salary,
            max_salary: job.max_salary,
            benefits: job.benefits,
            skills_required: job.skills_required,
            posted_date: job.posted_date,
            industry: job.industry,
            job_type: job.job_type,
            similarity_scores: annotations
                .similarity_scores
                .get(&id)
                .cloned()
                .unwrap_or_default(),
            is_favorite: annotations.favorites.contains(&id).then_some(true),
            is_applied: annotations.applied.contains(&id),
            click_count: annotations.click_counts.get(&id).copied().unwrap_or(0),
            is_ad: false,
        }
    }
}

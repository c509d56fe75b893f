//! Persistence seam for the CV lifecycle.
//!
//! Everything the lifecycle services read or write goes through [`Store`], so
//! the invariants they enforce can be exercised without a database.
//! `AppState` carries an `Arc<dyn Store>` backed by [`postgres::PgStore`].
//! Read-mostly surfaces (catalog, survey, notifications) query the pool
//! directly from their own modules.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::AppError;
use crate::models::candidate::{CandidateRow, CandidateUpdate};
use crate::models::career::{CareerRow, CareerTranslationRow};
use crate::models::cv::{
    AbstractTemplateRow, CvDataInput, CvDataRow, CvRow, NewCv, NewTemplate, TemplateRow,
};
use crate::models::job::{JobInput, JobRow, JobSearchRow};
use crate::models::scraping::{CombinationRow, KeywordRow, LocationRow};
use crate::models::settings::{GeneralSettingsRow, GeneralSettingsUpdate};
use crate::models::user::{NewUser, UserProfileRow, UserRow};
use crate::models::DbId;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub type StoreResult<T> = Result<T, AppError>;

/// Result of inserting a CV: the new row plus the base CVs it displaced.
#[derive(Debug, Clone)]
pub struct InsertedCv {
    pub cv: CvRow,
    pub replaced_cv_ids: Vec<DbId>,
}

#[async_trait]
pub trait Store: Send + Sync {
    // ── Accounts ────────────────────────────────────────────────────────────

    async fn create_user(&self, user: &NewUser) -> StoreResult<UserRow>;

    async fn get_user(&self, id: DbId) -> StoreResult<Option<UserRow>>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<UserRow>>;

    async fn create_user_profile(
        &self,
        user_id: DbId,
        is_verified: bool,
    ) -> StoreResult<UserProfileRow>;

    async fn get_or_create_candidate(&self, user_id: DbId) -> StoreResult<CandidateRow>;

    async fn update_candidate(
        &self,
        candidate_id: DbId,
        update: &CandidateUpdate,
    ) -> StoreResult<CandidateRow>;

    /// Adds `amount` to the candidate's balance and returns the updated row.
    async fn add_credits(&self, candidate_id: DbId, amount: f64) -> StoreResult<CandidateRow>;

    // ── Settings ────────────────────────────────────────────────────────────

    async fn general_settings(&self) -> StoreResult<GeneralSettingsRow>;

    async fn update_general_settings(
        &self,
        update: &GeneralSettingsUpdate,
    ) -> StoreResult<GeneralSettingsRow>;

    // ── Templates ───────────────────────────────────────────────────────────

    async fn find_abstract_template_by_name(
        &self,
        name: &str,
    ) -> StoreResult<Option<AbstractTemplateRow>>;

    async fn get_abstract_template(&self, id: DbId) -> StoreResult<Option<AbstractTemplateRow>>;

    async fn insert_abstract_template(
        &self,
        name: &str,
        reference: Option<&str>,
        image: Option<&str>,
    ) -> StoreResult<AbstractTemplateRow>;

    async fn list_abstract_templates(&self) -> StoreResult<Vec<AbstractTemplateRow>>;

    async fn insert_template(&self, template: &NewTemplate) -> StoreResult<TemplateRow>;

    async fn get_template(&self, id: DbId) -> StoreResult<Option<TemplateRow>>;

    async fn set_template_language(&self, id: DbId, language: Option<&str>) -> StoreResult<()>;

    // ── CVs ─────────────────────────────────────────────────────────────────

    /// Inserts a CV. A base CV atomically replaces every other base CV of the
    /// same candidate (and their templates) before the new row is written.
    async fn insert_cv(&self, cv: &NewCv) -> StoreResult<InsertedCv>;

    async fn get_cv(&self, id: DbId) -> StoreResult<Option<CvRow>>;

    async fn list_cvs(&self, candidate_id: DbId) -> StoreResult<Vec<CvRow>>;

    async fn find_base_cv(&self, candidate_id: DbId) -> StoreResult<Option<CvRow>>;

    async fn set_cv_name(&self, id: DbId, name: &str) -> StoreResult<()>;

    async fn set_cv_template(&self, id: DbId, template_id: DbId) -> StoreResult<()>;

    async fn set_cv_artifacts(
        &self,
        id: DbId,
        generated_pdf: &str,
        thumbnail: Option<&str>,
    ) -> StoreResult<()>;

    /// Deletes a CV and the template it owns in one transaction, template
    /// first. Returns the deleted row, or `None` when the CV does not exist.
    async fn delete_cv_with_template(&self, id: DbId) -> StoreResult<Option<CvRow>>;

    // ── CV data ─────────────────────────────────────────────────────────────

    async fn get_cv_data(&self, cv_id: DbId) -> StoreResult<Option<CvDataRow>>;

    async fn insert_cv_data(&self, cv_id: DbId, data: &CvDataInput) -> StoreResult<CvDataRow>;

    async fn update_cv_data(&self, cv_id: DbId, data: &CvDataInput) -> StoreResult<CvDataRow>;

    async fn set_cv_data_title(&self, cv_id: DbId, title: &str) -> StoreResult<()>;

    // ── Jobs ────────────────────────────────────────────────────────────────

    async fn get_job(&self, id: DbId) -> StoreResult<Option<JobRow>>;

    async fn find_job_by_external_id(&self, job_id: &str) -> StoreResult<Option<JobRow>>;

    /// Looks up a job by its (title, company, location) triple. Missing parts
    /// match missing parts.
    async fn find_job_by_identity(
        &self,
        title: Option<&str>,
        company_name: Option<&str>,
        location: Option<&str>,
    ) -> StoreResult<Option<JobRow>>;

    async fn insert_job(&self, job: &JobInput) -> StoreResult<JobRow>;

    async fn update_job(&self, id: DbId, job: &JobInput) -> StoreResult<JobRow>;

    async fn list_all_jobs(&self) -> StoreResult<Vec<JobRow>>;

    // ── Job searches ────────────────────────────────────────────────────────

    async fn get_job_search(&self, cv_id: DbId, job_id: DbId)
        -> StoreResult<Option<JobSearchRow>>;

    async fn upsert_job_search(
        &self,
        cv_id: DbId,
        job_id: DbId,
        similarity_score: f64,
        scored_at: DateTime<Utc>,
    ) -> StoreResult<JobSearchRow>;

    // ── Careers ─────────────────────────────────────────────────────────────

    async fn get_career(&self, id: DbId) -> StoreResult<Option<CareerRow>>;

    async fn find_career_translation(
        &self,
        career_id: DbId,
        language_code: &str,
    ) -> StoreResult<Option<CareerTranslationRow>>;

    async fn list_career_translations(
        &self,
        career_id: DbId,
    ) -> StoreResult<Vec<CareerTranslationRow>>;

    // ── Scraping targets ────────────────────────────────────────────────────

    /// Inserts a keyword and pairs it with every existing location.
    /// Returns the keyword and the number of combinations created.
    async fn create_keyword(&self, keyword: &str) -> StoreResult<(KeywordRow, u64)>;

    /// Inserts a location and pairs it with every existing keyword.
    async fn create_location(&self, location: &str) -> StoreResult<(LocationRow, u64)>;

    async fn list_keywords(&self) -> StoreResult<Vec<KeywordRow>>;

    async fn list_locations(&self) -> StoreResult<Vec<LocationRow>>;

    async fn list_combinations(&self) -> StoreResult<Vec<CombinationRow>>;
}

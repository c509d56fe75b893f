//! In-memory [`Store`] used by unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{InsertedCv, Store, StoreResult};
use crate::errors::AppError;
use crate::models::candidate::{CandidateRow, CandidateUpdate};
use crate::models::career::{CareerRow, CareerTranslationRow};
use crate::models::cv::{
    AbstractTemplateRow, CvDataInput, CvDataRow, CvRow, CvType, NewCv, NewTemplate, TemplateRow,
};
use crate::models::job::{JobInput, JobRow, JobSearchRow};
use crate::models::scraping::{CombinationRow, KeywordRow, LocationRow};
use crate::models::settings::{GeneralSettingsRow, GeneralSettingsUpdate};
use crate::models::user::{NewUser, UserProfileRow, UserRow};
use crate::models::DbId;

#[derive(Default)]
struct Tables {
    next_id: DbId,
    users: Vec<UserRow>,
    profiles: Vec<UserProfileRow>,
    candidates: Vec<CandidateRow>,
    abstract_templates: Vec<AbstractTemplateRow>,
    templates: Vec<TemplateRow>,
    cvs: Vec<CvRow>,
    cv_data: Vec<CvDataRow>,
    jobs: Vec<JobRow>,
    job_searches: Vec<JobSearchRow>,
    careers: Vec<CareerRow>,
    career_translations: Vec<CareerTranslationRow>,
    keywords: Vec<KeywordRow>,
    locations: Vec<LocationRow>,
    combinations: Vec<CombinationRow>,
    general: GeneralSettingsRow,
    fail_cv_deletes: bool,
}

impl Tables {
    fn id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn remove_cv(&mut self, cv_id: DbId) -> bool {
        let before = self.cvs.len();
        self.cvs.retain(|cv| cv.id != cv_id);
        self.cv_data.retain(|d| d.cv_id != cv_id);
        self.job_searches.retain(|s| s.cv_id != cv_id);
        self.cvs.len() != before
    }

    fn remove_template(&mut self, template_id: DbId) -> bool {
        let before = self.templates.len();
        self.templates.retain(|t| t.id != template_id);
        for cv in self.cvs.iter_mut() {
            if cv.template_id == Some(template_id) {
                cv.template_id = None;
            }
        }
        self.templates.len() != before
    }

    fn add_combination(&mut self, keyword_id: DbId, location_id: DbId) -> bool {
        let exists = self
            .combinations
            .iter()
            .any(|c| c.keyword_id == keyword_id && c.location_id == location_id);
        if exists {
            return false;
        }
        let id = self.id();
        self.combinations.push(CombinationRow {
            id,
            keyword_id,
            location_id,
            is_scraped: false,
        });
        true
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

fn cv_data_row(id: DbId, cv_id: DbId, data: &CvDataInput, created_at: DateTime<Utc>) -> CvDataRow {
    CvDataRow {
        id,
        cv_id,
        title: data.title.clone(),
        name: data.name.clone(),
        email: data.email.clone(),
        phone: data.phone.clone(),
        age: data.age,
        city: data.city.clone(),
        yoe: data.yoe.clone(),
        work: data.work.clone(),
        educations: data.educations.clone(),
        languages: data.languages.clone(),
        skills: data.skills.clone(),
        interests: data.interests.clone(),
        social: data.social.clone(),
        certifications: data.certifications.clone(),
        projects: data.projects.clone(),
        volunteering: data.volunteering.clone(),
        references: data.references.clone(),
        headline: data.headline.clone(),
        summary: data.summary.clone(),
        created_at,
        updated_at: Utc::now(),
    }
}

fn job_row(id: DbId, job: &JobInput, created_at: DateTime<Utc>) -> JobRow {
    JobRow {
        id,
        title: job.title.clone(),
        description: job.description.clone(),
        requirements: job.requirements.clone(),
        company_name: job.company_name.clone(),
        company_logo: job.company_logo.clone(),
        company_size: job.company_size,
        location: job.location.clone(),
        linkedin_profiles: job.linkedin_profiles.clone(),
        employment_type: job.employment_type.clone(),
        original_url: job.original_url.clone(),
        salary_range: job.salary_range.clone(),
        min_salary: job.min_salary,
        max_salary: job.max_salary,
        benefits: job.benefits.clone(),
        skills_required: job.skills_required.clone(),
        posted_date: job.posted_date,
        expiration_date: job.expiration_date,
        industry: job.industry.clone(),
        job_type: job.job_type.clone(),
        job_id: job.job_id.clone(),
        created_at,
        updated_at: Utc::now(),
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later CV delete fail before touching any row.
    pub fn fail_cv_deletes(&self) {
        self.tables.lock().unwrap().fail_cv_deletes = true;
    }

    pub fn add_candidate(&self) -> CandidateRow {
        let mut t = self.tables.lock().unwrap();
        let id = t.id();
        let row = CandidateRow {
            id,
            user_id: None,
            first_name: "Test".to_string(),
            last_name: "Candidate".to_string(),
            phone: None,
            age: None,
            city: None,
            country: None,
            credits: 0.0,
            profile_picture: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        t.candidates.push(row.clone());
        row
    }

    pub fn add_career(&self, group_identifier: &str, translations: &[(&str, &str)]) -> CareerRow {
        let mut t = self.tables.lock().unwrap();
        let id = t.id();
        let career = CareerRow {
            id,
            group_identifier: group_identifier.to_string(),
        };
        t.careers.push(career.clone());
        for (code, title) in translations {
            let translation_id = t.id();
            t.career_translations.push(CareerTranslationRow {
                id: translation_id,
                career_id: id,
                language_id: 0,
                language_code: code.to_string(),
                title: title.to_string(),
                transition_path: String::new(),
            });
        }
        career
    }

    pub fn seed_job_search(&self, cv_id: DbId, job_id: DbId, score: f64) {
        let mut t = self.tables.lock().unwrap();
        let id = t.id();
        t.job_searches.push(JobSearchRow {
            id,
            cv_id,
            job_id,
            similarity_score: score,
            search_date: Utc::now(),
            last_scored_at: None,
            is_applied: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
    }

    pub fn template_count(&self) -> usize {
        self.tables.lock().unwrap().templates.len()
    }

    pub fn job_count(&self) -> usize {
        self.tables.lock().unwrap().jobs.len()
    }

    pub fn profiles(&self) -> Vec<UserProfileRow> {
        self.tables.lock().unwrap().profiles.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: &NewUser) -> StoreResult<UserRow> {
        let mut t = self.tables.lock().unwrap();
        if t.users.iter().any(|u| u.username == user.username) {
            return Err(AppError::Conflict(format!(
                "Username '{}' is already taken",
                user.username
            )));
        }
        let id = t.id();
        let row = UserRow {
            id,
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            is_staff: user.is_staff,
            created_at: Utc::now(),
        };
        t.users.push(row.clone());
        Ok(row)
    }

    async fn get_user(&self, id: DbId) -> StoreResult<Option<UserRow>> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<UserRow>> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_user_profile(
        &self,
        user_id: DbId,
        is_verified: bool,
    ) -> StoreResult<UserProfileRow> {
        let mut t = self.tables.lock().unwrap();
        let id = t.id();
        let row = UserProfileRow {
            id,
            user_id,
            is_verified,
        };
        t.profiles.push(row.clone());
        Ok(row)
    }

    async fn get_or_create_candidate(&self, user_id: DbId) -> StoreResult<CandidateRow> {
        let mut t = self.tables.lock().unwrap();
        if let Some(existing) = t.candidates.iter().find(|c| c.user_id == Some(user_id)) {
            return Ok(existing.clone());
        }
        let id = t.id();
        let row = CandidateRow {
            id,
            user_id: Some(user_id),
            first_name: String::new(),
            last_name: String::new(),
            phone: None,
            age: None,
            city: None,
            country: None,
            credits: 0.0,
            profile_picture: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        t.candidates.push(row.clone());
        Ok(row)
    }

    async fn update_candidate(
        &self,
        candidate_id: DbId,
        update: &CandidateUpdate,
    ) -> StoreResult<CandidateRow> {
        let mut t = self.tables.lock().unwrap();
        let row = t
            .candidates
            .iter_mut()
            .find(|c| c.id == candidate_id)
            .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;
        if let Some(v) = &update.first_name {
            row.first_name = v.clone();
        }
        if let Some(v) = &update.last_name {
            row.last_name = v.clone();
        }
        if update.phone.is_some() {
            row.phone = update.phone.clone();
        }
        if update.age.is_some() {
            row.age = update.age;
        }
        if update.city.is_some() {
            row.city = update.city.clone();
        }
        if update.country.is_some() {
            row.country = update.country.clone();
        }
        if update.profile_picture.is_some() {
            row.profile_picture = update.profile_picture.clone();
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn add_credits(&self, candidate_id: DbId, amount: f64) -> StoreResult<CandidateRow> {
        let mut t = self.tables.lock().unwrap();
        let row = t
            .candidates
            .iter_mut()
            .find(|c| c.id == candidate_id)
            .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;
        row.credits += amount;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn general_settings(&self) -> StoreResult<GeneralSettingsRow> {
        Ok(self.tables.lock().unwrap().general.clone())
    }

    async fn update_general_settings(
        &self,
        update: &GeneralSettingsUpdate,
    ) -> StoreResult<GeneralSettingsRow> {
        let mut t = self.tables.lock().unwrap();
        let general = &mut t.general;
        if let Some(v) = update.ads_per_page {
            general.ads_per_page = v;
        }
        if let Some(v) = update.max_recent_search_terms {
            general.max_recent_search_terms = v;
        }
        if let Some(v) = update.credits_to_start_with {
            general.credits_to_start_with = v;
        }
        if let Some(v) = update.num_of_careers_to_generate {
            general.num_of_careers_to_generate = v;
        }
        general.last_updated = Utc::now();
        Ok(general.clone())
    }

    async fn find_abstract_template_by_name(
        &self,
        name: &str,
    ) -> StoreResult<Option<AbstractTemplateRow>> {
        let t = self.tables.lock().unwrap();
        Ok(t.abstract_templates.iter().find(|a| a.name == name).cloned())
    }

    async fn get_abstract_template(&self, id: DbId) -> StoreResult<Option<AbstractTemplateRow>> {
        let t = self.tables.lock().unwrap();
        Ok(t.abstract_templates.iter().find(|a| a.id == id).cloned())
    }

    async fn insert_abstract_template(
        &self,
        name: &str,
        reference: Option<&str>,
        image: Option<&str>,
    ) -> StoreResult<AbstractTemplateRow> {
        let mut t = self.tables.lock().unwrap();
        let id = t.id();
        let row = AbstractTemplateRow {
            id,
            name: name.to_string(),
            reference: reference.map(String::from),
            image: image.map(String::from),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        t.abstract_templates.push(row.clone());
        Ok(row)
    }

    async fn list_abstract_templates(&self) -> StoreResult<Vec<AbstractTemplateRow>> {
        Ok(self.tables.lock().unwrap().abstract_templates.clone())
    }

    async fn insert_template(&self, template: &NewTemplate) -> StoreResult<TemplateRow> {
        let mut t = self.tables.lock().unwrap();
        let id = t.id();
        let row = TemplateRow {
            id,
            language: template.language.clone(),
            abstract_template_id: template.abstract_template_id,
            company_logo: template.company_logo.clone(),
            page: template.page.clone(),
            certifications: template.certifications.clone(),
            education: template.education.clone(),
            experience: template.experience.clone(),
            volunteering: template.volunteering.clone(),
            interests: template.interests.clone(),
            languages: template.languages.clone(),
            projects: template.projects.clone(),
            references: template.references.clone(),
            skills: template.skills.clone(),
            social: template.social.clone(),
            theme: template.theme.clone(),
            personnel: template.personnel.clone(),
            typography: template.typography.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        t.templates.push(row.clone());
        Ok(row)
    }

    async fn get_template(&self, id: DbId) -> StoreResult<Option<TemplateRow>> {
        let t = self.tables.lock().unwrap();
        Ok(t.templates.iter().find(|tpl| tpl.id == id).cloned())
    }

    async fn set_template_language(&self, id: DbId, language: Option<&str>) -> StoreResult<()> {
        let mut t = self.tables.lock().unwrap();
        if let Some(tpl) = t.templates.iter_mut().find(|tpl| tpl.id == id) {
            tpl.language = language.map(String::from);
        }
        Ok(())
    }

    async fn insert_cv(&self, cv: &NewCv) -> StoreResult<InsertedCv> {
        let mut t = self.tables.lock().unwrap();
        let mut replaced_cv_ids = Vec::new();

        if cv.cv_type == CvType::Base {
            let previous: Vec<(DbId, Option<DbId>)> = t
                .cvs
                .iter()
                .filter(|c| c.candidate_id == cv.candidate_id && c.is_base())
                .map(|c| (c.id, c.template_id))
                .collect();
            for (cv_id, template_id) in previous {
                t.remove_cv(cv_id);
                if let Some(template_id) = template_id {
                    t.remove_template(template_id);
                }
                replaced_cv_ids.push(cv_id);
            }
        }

        let id = t.id();
        let row = CvRow {
            id,
            uid: Uuid::new_v4(),
            candidate_id: cv.candidate_id,
            original_file: cv.original_file.clone(),
            template_id: cv.template_id,
            generated_pdf: None,
            name: cv.name.clone(),
            cv_type: cv.cv_type.as_str().to_string(),
            job_id: cv.job_id,
            career_id: cv.career_id,
            thumbnail: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        t.cvs.push(row.clone());
        Ok(InsertedCv {
            cv: row,
            replaced_cv_ids,
        })
    }

    async fn get_cv(&self, id: DbId) -> StoreResult<Option<CvRow>> {
        let t = self.tables.lock().unwrap();
        Ok(t.cvs.iter().find(|c| c.id == id).cloned())
    }

    async fn list_cvs(&self, candidate_id: DbId) -> StoreResult<Vec<CvRow>> {
        let t = self.tables.lock().unwrap();
        Ok(t.cvs
            .iter()
            .filter(|c| c.candidate_id == candidate_id)
            .cloned()
            .collect())
    }

    async fn find_base_cv(&self, candidate_id: DbId) -> StoreResult<Option<CvRow>> {
        let t = self.tables.lock().unwrap();
        Ok(t.cvs
            .iter()
            .find(|c| c.candidate_id == candidate_id && c.is_base())
            .cloned())
    }

    async fn set_cv_name(&self, id: DbId, name: &str) -> StoreResult<()> {
        let mut t = self.tables.lock().unwrap();
        if let Some(cv) = t.cvs.iter_mut().find(|c| c.id == id) {
            cv.name = Some(name.to_string());
        }
        Ok(())
    }

    async fn set_cv_template(&self, id: DbId, template_id: DbId) -> StoreResult<()> {
        let mut t = self.tables.lock().unwrap();
        if let Some(cv) = t.cvs.iter_mut().find(|c| c.id == id) {
            cv.template_id = Some(template_id);
        }
        Ok(())
    }

    async fn set_cv_artifacts(
        &self,
        id: DbId,
        generated_pdf: &str,
        thumbnail: Option<&str>,
    ) -> StoreResult<()> {
        let mut t = self.tables.lock().unwrap();
        if let Some(cv) = t.cvs.iter_mut().find(|c| c.id == id) {
            cv.generated_pdf = Some(generated_pdf.to_string());
            if let Some(thumbnail) = thumbnail {
                cv.thumbnail = Some(thumbnail.to_string());
            }
        }
        Ok(())
    }

    async fn delete_cv_with_template(&self, id: DbId) -> StoreResult<Option<CvRow>> {
        let mut t = self.tables.lock().unwrap();
        if t.fail_cv_deletes {
            return Err(AppError::Internal(anyhow::anyhow!("CV delete failed")));
        }
        let Some(cv) = t.cvs.iter().find(|cv| cv.id == id).cloned() else {
            return Ok(None);
        };
        if let Some(template_id) = cv.template_id {
            t.remove_template(template_id);
        }
        t.remove_cv(id);
        Ok(Some(cv))
    }

    async fn get_cv_data(&self, cv_id: DbId) -> StoreResult<Option<CvDataRow>> {
        let t = self.tables.lock().unwrap();
        Ok(t.cv_data.iter().find(|d| d.cv_id == cv_id).cloned())
    }

    async fn insert_cv_data(&self, cv_id: DbId, data: &CvDataInput) -> StoreResult<CvDataRow> {
        let mut t = self.tables.lock().unwrap();
        if t.cv_data.iter().any(|d| d.cv_id == cv_id) {
            return Err(AppError::Conflict(format!("CV {cv_id} already has data")));
        }
        let id = t.id();
        let row = cv_data_row(id, cv_id, data, Utc::now());
        t.cv_data.push(row.clone());
        Ok(row)
    }

    async fn update_cv_data(&self, cv_id: DbId, data: &CvDataInput) -> StoreResult<CvDataRow> {
        let mut t = self.tables.lock().unwrap();
        let existing = t
            .cv_data
            .iter_mut()
            .find(|d| d.cv_id == cv_id)
            .ok_or_else(|| AppError::NotFound(format!("CV data for CV {cv_id} not found")))?;
        *existing = cv_data_row(existing.id, cv_id, data, existing.created_at);
        Ok(existing.clone())
    }

    async fn set_cv_data_title(&self, cv_id: DbId, title: &str) -> StoreResult<()> {
        let mut t = self.tables.lock().unwrap();
        if let Some(d) = t.cv_data.iter_mut().find(|d| d.cv_id == cv_id) {
            d.title = Some(title.to_string());
        }
        Ok(())
    }

    async fn get_job(&self, id: DbId) -> StoreResult<Option<JobRow>> {
        let t = self.tables.lock().unwrap();
        Ok(t.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn find_job_by_external_id(&self, job_id: &str) -> StoreResult<Option<JobRow>> {
        let t = self.tables.lock().unwrap();
        Ok(t.jobs
            .iter()
            .find(|j| j.job_id.as_deref() == Some(job_id))
            .cloned())
    }

    async fn find_job_by_identity(
        &self,
        title: Option<&str>,
        company_name: Option<&str>,
        location: Option<&str>,
    ) -> StoreResult<Option<JobRow>> {
        let t = self.tables.lock().unwrap();
        Ok(t.jobs
            .iter()
            .find(|j| {
                j.title.as_deref() == title
                    && j.company_name.as_deref() == company_name
                    && j.location.as_deref() == location
            })
            .cloned())
    }

    async fn insert_job(&self, job: &JobInput) -> StoreResult<JobRow> {
        let mut t = self.tables.lock().unwrap();
        if let Some(external) = &job.job_id {
            if t.jobs.iter().any(|j| j.job_id.as_ref() == Some(external)) {
                return Err(AppError::Conflict(
                    "A job with this job_id already exists".to_string(),
                ));
            }
        }
        let id = t.id();
        let row = job_row(id, job, Utc::now());
        t.jobs.push(row.clone());
        Ok(row)
    }

    async fn update_job(&self, id: DbId, job: &JobInput) -> StoreResult<JobRow> {
        let mut t = self.tables.lock().unwrap();
        let existing = t
            .jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
        *existing = job_row(id, job, existing.created_at);
        Ok(existing.clone())
    }

    async fn list_all_jobs(&self) -> StoreResult<Vec<JobRow>> {
        Ok(self.tables.lock().unwrap().jobs.clone())
    }

    async fn get_job_search(
        &self,
        cv_id: DbId,
        job_id: DbId,
    ) -> StoreResult<Option<JobSearchRow>> {
        let t = self.tables.lock().unwrap();
        Ok(t.job_searches
            .iter()
            .find(|s| s.cv_id == cv_id && s.job_id == job_id)
            .cloned())
    }

    async fn upsert_job_search(
        &self,
        cv_id: DbId,
        job_id: DbId,
        similarity_score: f64,
        scored_at: DateTime<Utc>,
    ) -> StoreResult<JobSearchRow> {
        let mut t = self.tables.lock().unwrap();
        if let Some(existing) = t
            .job_searches
            .iter_mut()
            .find(|s| s.cv_id == cv_id && s.job_id == job_id)
        {
            existing.similarity_score = similarity_score;
            existing.last_scored_at = Some(scored_at);
            existing.updated_at = Utc::now();
            return Ok(existing.clone());
        }
        let id = t.id();
        let row = JobSearchRow {
            id,
            cv_id,
            job_id,
            similarity_score,
            search_date: Utc::now(),
            last_scored_at: Some(scored_at),
            is_applied: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        t.job_searches.push(row.clone());
        Ok(row)
    }

    async fn get_career(&self, id: DbId) -> StoreResult<Option<CareerRow>> {
        let t = self.tables.lock().unwrap();
        Ok(t.careers.iter().find(|c| c.id == id).cloned())
    }

    async fn find_career_translation(
        &self,
        career_id: DbId,
        language_code: &str,
    ) -> StoreResult<Option<CareerTranslationRow>> {
        let t = self.tables.lock().unwrap();
        Ok(t.career_translations
            .iter()
            .find(|tr| tr.career_id == career_id && tr.language_code == language_code)
            .cloned())
    }

    async fn list_career_translations(
        &self,
        career_id: DbId,
    ) -> StoreResult<Vec<CareerTranslationRow>> {
        let t = self.tables.lock().unwrap();
        Ok(t.career_translations
            .iter()
            .filter(|tr| tr.career_id == career_id)
            .cloned()
            .collect())
    }

    async fn create_keyword(&self, keyword: &str) -> StoreResult<(KeywordRow, u64)> {
        let mut t = self.tables.lock().unwrap();
        if t.keywords.iter().any(|k| k.keyword == keyword) {
            return Err(AppError::Conflict(format!(
                "Keyword '{keyword}' already exists"
            )));
        }
        let id = t.id();
        let row = KeywordRow {
            id,
            keyword: keyword.to_string(),
            is_scraped: false,
        };
        t.keywords.push(row.clone());
        let location_ids: Vec<DbId> = t.locations.iter().map(|l| l.id).collect();
        let created = location_ids
            .into_iter()
            .filter(|location_id| t.add_combination(id, *location_id))
            .count() as u64;
        Ok((row, created))
    }

    async fn create_location(&self, location: &str) -> StoreResult<(LocationRow, u64)> {
        let mut t = self.tables.lock().unwrap();
        if t.locations.iter().any(|l| l.location == location) {
            return Err(AppError::Conflict(format!(
                "Location '{location}' already exists"
            )));
        }
        let id = t.id();
        let row = LocationRow {
            id,
            location: location.to_string(),
            is_scraped: false,
        };
        t.locations.push(row.clone());
        let keyword_ids: Vec<DbId> = t.keywords.iter().map(|k| k.id).collect();
        let created = keyword_ids
            .into_iter()
            .filter(|keyword_id| t.add_combination(*keyword_id, id))
            .count() as u64;
        Ok((row, created))
    }

    async fn list_keywords(&self) -> StoreResult<Vec<KeywordRow>> {
        Ok(self.tables.lock().unwrap().keywords.clone())
    }

    async fn list_locations(&self) -> StoreResult<Vec<LocationRow>> {
        Ok(self.tables.lock().unwrap().locations.clone())
    }

    async fn list_combinations(&self) -> StoreResult<Vec<CombinationRow>> {
        Ok(self.tables.lock().unwrap().combinations.clone())
    }
}

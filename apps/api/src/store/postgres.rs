use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{InsertedCv, Store, StoreResult};
use crate::errors::{is_unique_violation, AppError};
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

/// sqlx-backed [`Store`].
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn conflict_or(error: sqlx::Error, message: impl Into<String>) -> AppError {
    if is_unique_violation(&error) {
        AppError::Conflict(message.into())
    } else {
        AppError::Database(error)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: &NewUser) -> StoreResult<UserRow> {
        sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, email, password_hash, is_staff)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_staff)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or(e, format!("Username '{}' is already taken", user.username)))
    }

    async fn get_user(&self, id: DbId) -> StoreResult<Option<UserRow>> {
        Ok(
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<UserRow>> {
        Ok(
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create_user_profile(
        &self,
        user_id: DbId,
        is_verified: bool,
    ) -> StoreResult<UserProfileRow> {
        Ok(sqlx::query_as::<_, UserProfileRow>(
            "INSERT INTO user_profiles (user_id, is_verified) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(is_verified)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn get_or_create_candidate(&self, user_id: DbId) -> StoreResult<CandidateRow> {
        sqlx::query("INSERT INTO candidates (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(
            sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?,
        )
    }

    async fn update_candidate(
        &self,
        candidate_id: DbId,
        update: &CandidateUpdate,
    ) -> StoreResult<CandidateRow> {
        sqlx::query_as::<_, CandidateRow>(
            r#"
            UPDATE candidates SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                phone = COALESCE($4, phone),
                age = COALESCE($5, age),
                city = COALESCE($6, city),
                country = COALESCE($7, country),
                profile_picture = COALESCE($8, profile_picture),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(candidate_id)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.phone)
        .bind(update.age)
        .bind(&update.city)
        .bind(&update.country)
        .bind(&update.profile_picture)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))
    }

    async fn add_credits(&self, candidate_id: DbId, amount: f64) -> StoreResult<CandidateRow> {
        sqlx::query_as::<_, CandidateRow>(
            "UPDATE candidates SET credits = credits + $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(candidate_id)
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))
    }

    async fn general_settings(&self) -> StoreResult<GeneralSettingsRow> {
        let row = sqlx::query_as::<_, GeneralSettingsRow>(
            "SELECT * FROM general_settings WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.unwrap_or_default())
    }

    async fn update_general_settings(
        &self,
        update: &GeneralSettingsUpdate,
    ) -> StoreResult<GeneralSettingsRow> {
        Ok(sqlx::query_as::<_, GeneralSettingsRow>(
            r#"
            INSERT INTO general_settings
                (id, ads_per_page, max_recent_search_terms, credits_to_start_with,
                 num_of_careers_to_generate)
            VALUES (1, COALESCE($1, 2), COALESCE($2, 10), COALESCE($3, 10), COALESCE($4, 5))
            ON CONFLICT (id) DO UPDATE SET
                ads_per_page = COALESCE($1, general_settings.ads_per_page),
                max_recent_search_terms = COALESCE($2, general_settings.max_recent_search_terms),
                credits_to_start_with = COALESCE($3, general_settings.credits_to_start_with),
                num_of_careers_to_generate =
                    COALESCE($4, general_settings.num_of_careers_to_generate),
                last_updated = NOW()
            RETURNING *
            "#,
        )
        .bind(update.ads_per_page)
        .bind(update.max_recent_search_terms)
        .bind(update.credits_to_start_with)
        .bind(update.num_of_careers_to_generate)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_abstract_template_by_name(
        &self,
        name: &str,
    ) -> StoreResult<Option<AbstractTemplateRow>> {
        Ok(sqlx::query_as::<_, AbstractTemplateRow>(
            "SELECT * FROM abstract_templates WHERE name = $1 ORDER BY id LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn get_abstract_template(&self, id: DbId) -> StoreResult<Option<AbstractTemplateRow>> {
        Ok(
            sqlx::query_as::<_, AbstractTemplateRow>("SELECT * FROM abstract_templates WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert_abstract_template(
        &self,
        name: &str,
        reference: Option<&str>,
        image: Option<&str>,
    ) -> StoreResult<AbstractTemplateRow> {
        Ok(sqlx::query_as::<_, AbstractTemplateRow>(
            "INSERT INTO abstract_templates (name, reference, image) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(name)
        .bind(reference)
        .bind(image)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn list_abstract_templates(&self) -> StoreResult<Vec<AbstractTemplateRow>> {
        Ok(
            sqlx::query_as::<_, AbstractTemplateRow>("SELECT * FROM abstract_templates ORDER BY name")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn insert_template(&self, template: &NewTemplate) -> StoreResult<TemplateRow> {
        Ok(sqlx::query_as::<_, TemplateRow>(
            r#"
            INSERT INTO templates
                (language, abstract_template_id, company_logo, page, certifications,
                 education, experience, volunteering, interests, languages, projects,
                 "references", skills, social, theme, personnel, typography)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(&template.language)
        .bind(template.abstract_template_id)
        .bind(&template.company_logo)
        .bind(&template.page)
        .bind(&template.certifications)
        .bind(&template.education)
        .bind(&template.experience)
        .bind(&template.volunteering)
        .bind(&template.interests)
        .bind(&template.languages)
        .bind(&template.projects)
        .bind(&template.references)
        .bind(&template.skills)
        .bind(&template.social)
        .bind(&template.theme)
        .bind(&template.personnel)
        .bind(&template.typography)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn get_template(&self, id: DbId) -> StoreResult<Option<TemplateRow>> {
        Ok(
            sqlx::query_as::<_, TemplateRow>("SELECT * FROM templates WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn set_template_language(&self, id: DbId, language: Option<&str>) -> StoreResult<()> {
        sqlx::query("UPDATE templates SET language = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(language)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_cv(&self, cv: &NewCv) -> StoreResult<InsertedCv> {
        let mut tx = self.pool.begin().await?;
        let mut replaced_cv_ids = Vec::new();

        if cv.cv_type == CvType::Base {
            let previous: Vec<(DbId, Option<DbId>)> = sqlx::query_as(
                "SELECT id, template_id FROM cvs WHERE candidate_id = $1 AND cv_type = 'base' FOR UPDATE",
            )
            .bind(cv.candidate_id)
            .fetch_all(&mut *tx)
            .await?;

            for (cv_id, template_id) in previous {
                sqlx::query("DELETE FROM cvs WHERE id = $1")
                    .bind(cv_id)
                    .execute(&mut *tx)
                    .await?;
                if let Some(template_id) = template_id {
                    sqlx::query("DELETE FROM templates WHERE id = $1")
                        .bind(template_id)
                        .execute(&mut *tx)
                        .await?;
                }
                replaced_cv_ids.push(cv_id);
            }
        }

        let row = sqlx::query_as::<_, CvRow>(
            r#"
            INSERT INTO cvs
                (uid, candidate_id, original_file, template_id, name, cv_type, job_id, career_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(cv.candidate_id)
        .bind(&cv.original_file)
        .bind(cv.template_id)
        .bind(&cv.name)
        .bind(cv.cv_type.as_str())
        .bind(cv.job_id)
        .bind(cv.career_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        if !replaced_cv_ids.is_empty() {
            info!(
                candidate_id = cv.candidate_id,
                replaced = ?replaced_cv_ids,
                "Replaced previous base CVs"
            );
        }

        Ok(InsertedCv {
            cv: row,
            replaced_cv_ids,
        })
    }

    async fn get_cv(&self, id: DbId) -> StoreResult<Option<CvRow>> {
        Ok(sqlx::query_as::<_, CvRow>("SELECT * FROM cvs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_cvs(&self, candidate_id: DbId) -> StoreResult<Vec<CvRow>> {
        Ok(sqlx::query_as::<_, CvRow>(
            "SELECT * FROM cvs WHERE candidate_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_base_cv(&self, candidate_id: DbId) -> StoreResult<Option<CvRow>> {
        Ok(sqlx::query_as::<_, CvRow>(
            "SELECT * FROM cvs WHERE candidate_id = $1 AND cv_type = 'base' ORDER BY id LIMIT 1",
        )
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn set_cv_name(&self, id: DbId, name: &str) -> StoreResult<()> {
        sqlx::query("UPDATE cvs SET name = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_cv_template(&self, id: DbId, template_id: DbId) -> StoreResult<()> {
        sqlx::query("UPDATE cvs SET template_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(template_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_cv_artifacts(
        &self,
        id: DbId,
        generated_pdf: &str,
        thumbnail: Option<&str>,
    ) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE cvs SET
                generated_pdf = $2,
                thumbnail = COALESCE($3, thumbnail),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(generated_pdf)
        .bind(thumbnail)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_cv_with_template(&self, id: DbId) -> StoreResult<Option<CvRow>> {
        let mut tx = self.pool.begin().await?;

        let Some(cv) = sqlx::query_as::<_, CvRow>("SELECT * FROM cvs WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(template_id) = cv.template_id {
            sqlx::query("DELETE FROM templates WHERE id = $1")
                .bind(template_id)
                .execute(&mut *tx)
                .await?;
        }
        sqlx::query("DELETE FROM cvs WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(cv))
    }

    async fn get_cv_data(&self, cv_id: DbId) -> StoreResult<Option<CvDataRow>> {
        Ok(
            sqlx::query_as::<_, CvDataRow>("SELECT * FROM cv_data WHERE cv_id = $1")
                .bind(cv_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert_cv_data(&self, cv_id: DbId, data: &CvDataInput) -> StoreResult<CvDataRow> {
        sqlx::query_as::<_, CvDataRow>(
            r#"
            INSERT INTO cv_data
                (cv_id, title, name, email, phone, age, city, yoe, work, educations,
                 languages, skills, interests, social, certifications, projects,
                 volunteering, "references", headline, summary)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            RETURNING *
            "#,
        )
        .bind(cv_id)
        .bind(&data.title)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(data.age)
        .bind(&data.city)
        .bind(&data.yoe)
        .bind(&data.work)
        .bind(&data.educations)
        .bind(&data.languages)
        .bind(&data.skills)
        .bind(&data.interests)
        .bind(&data.social)
        .bind(&data.certifications)
        .bind(&data.projects)
        .bind(&data.volunteering)
        .bind(&data.references)
        .bind(&data.headline)
        .bind(&data.summary)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or(e, format!("CV {cv_id} already has data")))
    }

    async fn update_cv_data(&self, cv_id: DbId, data: &CvDataInput) -> StoreResult<CvDataRow> {
        sqlx::query_as::<_, CvDataRow>(
            r#"
            UPDATE cv_data SET
                title = $2, name = $3, email = $4, phone = $5, age = $6, city = $7,
                yoe = $8, work = $9, educations = $10, languages = $11, skills = $12,
                interests = $13, social = $14, certifications = $15, projects = $16,
                volunteering = $17, "references" = $18, headline = $19, summary = $20,
                updated_at = NOW()
            WHERE cv_id = $1
            RETURNING *
            "#,
        )
        .bind(cv_id)
        .bind(&data.title)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(data.age)
        .bind(&data.city)
        .bind(&data.yoe)
        .bind(&data.work)
        .bind(&data.educations)
        .bind(&data.languages)
        .bind(&data.skills)
        .bind(&data.interests)
        .bind(&data.social)
        .bind(&data.certifications)
        .bind(&data.projects)
        .bind(&data.volunteering)
        .bind(&data.references)
        .bind(&data.headline)
        .bind(&data.summary)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("CV data for CV {cv_id} not found")))
    }

    async fn set_cv_data_title(&self, cv_id: DbId, title: &str) -> StoreResult<()> {
        sqlx::query("UPDATE cv_data SET title = $2 WHERE cv_id = $1")
            .bind(cv_id)
            .bind(title)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_job(&self, id: DbId) -> StoreResult<Option<JobRow>> {
        Ok(sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_job_by_external_id(&self, job_id: &str) -> StoreResult<Option<JobRow>> {
        Ok(sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE job_id = $1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_job_by_identity(
        &self,
        title: Option<&str>,
        company_name: Option<&str>,
        location: Option<&str>,
    ) -> StoreResult<Option<JobRow>> {
        Ok(sqlx::query_as::<_, JobRow>(
            r#"
            SELECT * FROM jobs
            WHERE title IS NOT DISTINCT FROM $1
              AND company_name IS NOT DISTINCT FROM $2
              AND location IS NOT DISTINCT FROM $3
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(title)
        .bind(company_name)
        .bind(location)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert_job(&self, job: &JobInput) -> StoreResult<JobRow> {
        sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs
                (title, description, requirements, company_name, company_logo, company_size,
                 location, linkedin_profiles, employment_type, original_url, salary_range,
                 min_salary, max_salary, benefits, skills_required, posted_date,
                 expiration_date, industry, job_type, job_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            RETURNING *
            "#,
        )
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.requirements)
        .bind(&job.company_name)
        .bind(&job.company_logo)
        .bind(job.company_size)
        .bind(&job.location)
        .bind(&job.linkedin_profiles)
        .bind(&job.employment_type)
        .bind(&job.original_url)
        .bind(&job.salary_range)
        .bind(job.min_salary)
        .bind(job.max_salary)
        .bind(&job.benefits)
        .bind(&job.skills_required)
        .bind(job.posted_date)
        .bind(job.expiration_date)
        .bind(&job.industry)
        .bind(&job.job_type)
        .bind(&job.job_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or(e, "A job with this job_id already exists"))
    }

    async fn update_job(&self, id: DbId, job: &JobInput) -> StoreResult<JobRow> {
        sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs SET
                title = $2, description = $3, requirements = $4, company_name = $5,
                company_logo = $6, company_size = $7, location = $8, linkedin_profiles = $9,
                employment_type = $10, original_url = $11, salary_range = $12,
                min_salary = $13, max_salary = $14, benefits = $15, skills_required = $16,
                posted_date = $17, expiration_date = $18, industry = $19, job_type = $20,
                job_id = $21, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.requirements)
        .bind(&job.company_name)
        .bind(&job.company_logo)
        .bind(job.company_size)
        .bind(&job.location)
        .bind(&job.linkedin_profiles)
        .bind(&job.employment_type)
        .bind(&job.original_url)
        .bind(&job.salary_range)
        .bind(job.min_salary)
        .bind(job.max_salary)
        .bind(&job.benefits)
        .bind(&job.skills_required)
        .bind(job.posted_date)
        .bind(job.expiration_date)
        .bind(&job.industry)
        .bind(&job.job_type)
        .bind(&job.job_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_or(e, "A job with this job_id already exists"))?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
    }

    async fn list_all_jobs(&self) -> StoreResult<Vec<JobRow>> {
        Ok(sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY id")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_job_search(
        &self,
        cv_id: DbId,
        job_id: DbId,
    ) -> StoreResult<Option<JobSearchRow>> {
        Ok(sqlx::query_as::<_, JobSearchRow>(
            "SELECT * FROM job_searches WHERE cv_id = $1 AND job_id = $2",
        )
        .bind(cv_id)
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn upsert_job_search(
        &self,
        cv_id: DbId,
        job_id: DbId,
        similarity_score: f64,
        scored_at: DateTime<Utc>,
    ) -> StoreResult<JobSearchRow> {
        Ok(sqlx::query_as::<_, JobSearchRow>(
            r#"
            INSERT INTO job_searches (cv_id, job_id, similarity_score, last_scored_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (cv_id, job_id) DO UPDATE SET
                similarity_score = EXCLUDED.similarity_score,
                last_scored_at = EXCLUDED.last_scored_at,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(cv_id)
        .bind(job_id)
        .bind(similarity_score)
        .bind(scored_at)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn get_career(&self, id: DbId) -> StoreResult<Option<CareerRow>> {
        Ok(sqlx::query_as::<_, CareerRow>("SELECT * FROM careers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_career_translation(
        &self,
        career_id: DbId,
        language_code: &str,
    ) -> StoreResult<Option<CareerTranslationRow>> {
        Ok(sqlx::query_as::<_, CareerTranslationRow>(
            r#"
            SELECT ct.id, ct.career_id, ct.language_id, l.code AS language_code,
                   ct.title, ct.transition_path
            FROM career_translations ct
            JOIN languages l ON l.id = ct.language_id
            WHERE ct.career_id = $1 AND l.code = $2
            ORDER BY ct.id
            LIMIT 1
            "#,
        )
        .bind(career_id)
        .bind(language_code)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_career_translations(
        &self,
        career_id: DbId,
    ) -> StoreResult<Vec<CareerTranslationRow>> {
        Ok(sqlx::query_as::<_, CareerTranslationRow>(
            r#"
            SELECT ct.id, ct.career_id, ct.language_id, l.code AS language_code,
                   ct.title, ct.transition_path
            FROM career_translations ct
            JOIN languages l ON l.id = ct.language_id
            WHERE ct.career_id = $1
            ORDER BY ct.id
            "#,
        )
        .bind(career_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_keyword(&self, keyword: &str) -> StoreResult<(KeywordRow, u64)> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, KeywordRow>(
            "INSERT INTO keywords (keyword) VALUES ($1) RETURNING *",
        )
        .bind(keyword)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_or(e, format!("Keyword '{keyword}' already exists")))?;

        let created = sqlx::query(
            r#"
            INSERT INTO keyword_location_combinations (keyword_id, location_id)
            SELECT $1, id FROM locations
            ON CONFLICT (keyword_id, location_id) DO NOTHING
            "#,
        )
        .bind(row.id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;
        Ok((row, created))
    }

    async fn create_location(&self, location: &str) -> StoreResult<(LocationRow, u64)> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, LocationRow>(
            "INSERT INTO locations (location) VALUES ($1) RETURNING *",
        )
        .bind(location)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_or(e, format!("Location '{location}' already exists")))?;

        let created = sqlx::query(
            r#"
            INSERT INTO keyword_location_combinations (keyword_id, location_id)
            SELECT id, $1 FROM keywords
            ON CONFLICT (keyword_id, location_id) DO NOTHING
            "#,
        )
        .bind(row.id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;
        Ok((row, created))
    }

    async fn list_keywords(&self) -> StoreResult<Vec<KeywordRow>> {
        Ok(sqlx::query_as::<_, KeywordRow>("SELECT * FROM keywords ORDER BY keyword")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_locations(&self) -> StoreResult<Vec<LocationRow>> {
        Ok(sqlx::query_as::<_, LocationRow>("SELECT * FROM locations ORDER BY location")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_combinations(&self) -> StoreResult<Vec<CombinationRow>> {
        Ok(sqlx::query_as::<_, CombinationRow>(
            "SELECT * FROM keyword_location_combinations ORDER BY keyword_id, location_id",
        )
        .fetch_all(&self.pool)
        .await?)
    }
}

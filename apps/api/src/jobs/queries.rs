//! Listing and engagement queries for job boards.

use sqlx::PgPool;

use super::views::{CvScore, JobAnnotations};
use crate::errors::AppError;
use crate::models::job::{JobRow, JobSearchRow};
use crate::models::DbId;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Newest listings first. `search` matches title, company or location.
pub async fn list_jobs(
    db: &PgPool,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<JobRow>, AppError> {
    let pattern = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{s}%"));

    let jobs = sqlx::query_as::<_, JobRow>(
        r#"
        SELECT * FROM jobs
        WHERE $1::TEXT IS NULL
           OR title ILIKE $1
           OR company_name ILIKE $1
           OR location ILIKE $1
        ORDER BY posted_date DESC NULLS LAST, id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(pattern)
    .bind(limit.clamp(1, MAX_PAGE_SIZE))
    .bind(offset.max(0))
    .fetch_all(db)
    .await?;
    Ok(jobs)
}

#[derive(sqlx::FromRow)]
struct ScoreRow {
    job_id: DbId,
    cv_id: DbId,
    similarity_score: f64,
    is_applied: bool,
}

/// Builds the per-candidate annotation maps for a page of jobs.
pub async fn load_annotations(
    db: &PgPool,
    candidate_id: DbId,
    job_ids: &[DbId],
) -> Result<JobAnnotations, AppError> {
    let mut annotations = JobAnnotations::default();
    if job_ids.is_empty() {
        return Ok(annotations);
    }

    let scores = sqlx::query_as::<_, ScoreRow>(
        r#"
        SELECT js.job_id, js.cv_id, js.similarity_score, js.is_applied
        FROM job_searches js
        JOIN cvs ON cvs.id = js.cv_id
        WHERE cvs.candidate_id = $1 AND js.job_id = ANY($2)
        ORDER BY js.job_id, js.cv_id
        "#,
    )
    .bind(candidate_id)
    .bind(job_ids)
    .fetch_all(db)
    .await?;
    for row in scores {
        if row.is_applied {
            annotations.applied.insert(row.job_id);
        }
        annotations
            .similarity_scores
            .entry(row.job_id)
            .or_default()
            .push(CvScore {
                cv_id: row.cv_id,
                similarity_score: row.similarity_score,
            });
    }

    let favorites: Vec<(DbId,)> = sqlx::query_as(
        "SELECT job_id FROM favorites WHERE candidate_id = $1 AND job_id = ANY($2)",
    )
    .bind(candidate_id)
    .bind(job_ids)
    .fetch_all(db)
    .await?;
    annotations.favorites = favorites.into_iter().map(|(id,)| id).collect();

    let clicks: Vec<(DbId, i64)> = sqlx::query_as(
        "SELECT job_id, COUNT(*) FROM job_clicks WHERE job_id = ANY($1) GROUP BY job_id",
    )
    .bind(job_ids)
    .fetch_all(db)
    .await?;
    annotations.click_counts = clicks.into_iter().collect();

    Ok(annotations)
}

pub async fn list_favorite_jobs(db: &PgPool, candidate_id: DbId) -> Result<Vec<JobRow>, AppError> {
    Ok(sqlx::query_as::<_, JobRow>(
        r#"
        SELECT jobs.* FROM jobs
        JOIN favorites f ON f.job_id = jobs.id
        WHERE f.candidate_id = $1
        ORDER BY f.created_at DESC
        "#,
    )
    .bind(candidate_id)
    .fetch_all(db)
    .await?)
}

/// Idempotent: favoriting twice keeps a single row.
pub async fn add_favorite(db: &PgPool, candidate_id: DbId, job_id: DbId) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO favorites (candidate_id, job_id)
        VALUES ($1, $2)
        ON CONFLICT (candidate_id, job_id) DO NOTHING
        "#,
    )
    .bind(candidate_id)
    .bind(job_id)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn remove_favorite(
    db: &PgPool,
    candidate_id: DbId,
    job_id: DbId,
) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM favorites WHERE candidate_id = $1 AND job_id = $2")
        .bind(candidate_id)
        .bind(job_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Records a click. Each candidate counts once per job.
pub async fn record_click(db: &PgPool, candidate_id: DbId, job_id: DbId) -> Result<i64, AppError> {
    sqlx::query(
        r#"
        INSERT INTO job_clicks (job_id, candidate_id)
        VALUES ($1, $2)
        ON CONFLICT (job_id, candidate_id) DO NOTHING
        "#,
    )
    .bind(job_id)
    .bind(candidate_id)
    .execute(db)
    .await?;

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM job_clicks WHERE job_id = $1")
        .bind(job_id)
        .fetch_one(db)
        .await?;
    Ok(count)
}

/// Marks the job search of one of the candidate's CVs as applied.
pub async fn mark_applied(
    db: &PgPool,
    candidate_id: DbId,
    cv_id: DbId,
    job_id: DbId,
) -> Result<JobSearchRow, AppError> {
    sqlx::query_as::<_, JobSearchRow>(
        r#"
        UPDATE job_searches js SET is_applied = TRUE, updated_at = NOW()
        FROM cvs
        WHERE cvs.id = js.cv_id
          AND cvs.candidate_id = $1
          AND js.cv_id = $2
          AND js.job_id = $3
        RETURNING js.*
        "#,
    )
    .bind(candidate_id)
    .bind(cv_id)
    .bind(job_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("No job search for CV {cv_id} and job {job_id}")))
}

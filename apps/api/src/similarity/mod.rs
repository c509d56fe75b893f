//! CV-to-job similarity scores.
//!
//! Scores come from an external model and are noisy, so every write of an
//! existing score passes through [`apply_hysteresis`]: changes of two points
//! or less keep the stored value.

use chrono::Utc;

use crate::errors::AppError;
use crate::models::job::JobSearchRow;
use crate::models::DbId;
use crate::store::Store;

pub mod prompts;
pub mod scorer;
pub mod tailored;

pub use scorer::{LlmSimilarityScorer, SimilarityScorer};
pub use tailored::score_tailored_cv;

/// Score changes within this distance of the stored score are discarded.
pub const HYSTERESIS_BAND: f64 = 2.0;

/// Points a tailored CV is placed above its base CV when it does not beat it.
pub const IMPROVEMENT_BONUS: f64 = 5.0;

pub fn apply_hysteresis(old_score: f64, new_score: f64) -> f64 {
    if (new_score - old_score).abs() <= HYSTERESIS_BAND {
        old_score
    } else {
        new_score
    }
}

/// A tailored CV never scores at or below the base CV for the same job.
pub fn apply_improvement_bias(base_score: Option<f64>, new_score: f64) -> f64 {
    match base_score {
        Some(base) if base >= new_score => base + IMPROVEMENT_BONUS,
        _ => new_score,
    }
}

/// Upserts the (cv, job) score, keeping the stored value for small changes.
pub async fn record_similarity_score(
    store: &dyn Store,
    cv_id: DbId,
    job_id: DbId,
    score: f64,
) -> Result<JobSearchRow, AppError> {
    let effective = match store.get_job_search(cv_id, job_id).await? {
        Some(existing) => apply_hysteresis(existing.similarity_score, score),
        None => score,
    };
    store
        .upsert_job_search(cv_id, job_id, effective, Utc::now())
        .await
}

//! First-time scoring of a tailored CV against its job.

use tracing::{debug, info, warn};

use super::prompts::{build_candidate_profile, JobSummary};
use super::{apply_improvement_bias, record_similarity_score, SimilarityScorer};
use crate::errors::AppError;
use crate::models::cv::{CvDataRow, CvRow};
use crate::models::job::JobSearchRow;
use crate::store::Store;

/// True when the stored data had no title, name or email before this update,
/// i.e. the CV is receiving real content for the first time.
pub fn is_first_fill(before: &CvDataRow) -> bool {
    before.title.is_none() && before.name.is_none() && before.email.is_none()
}

/// Scores a tailored CV after its data is updated.
///
/// Runs only for tailored CVs attached to a job whose previous data was
/// empty. Failures are logged and yield `None`; they never fail the save.
pub async fn score_tailored_cv(
    store: &dyn Store,
    scorer: Option<&dyn SimilarityScorer>,
    cv: &CvRow,
    before: &CvDataRow,
    after: &CvDataRow,
) -> Option<JobSearchRow> {
    if !is_first_fill(before) || !cv.is_tailored() || cv.job_id.is_none() {
        return None;
    }
    let Some(scorer) = scorer else {
        debug!(cv_id = cv.id, "Similarity scoring disabled, skipping tailored CV");
        return None;
    };

    match try_score(store, scorer, cv, after).await {
        Ok(Some(search)) => {
            info!(
                cv_id = cv.id,
                job_id = search.job_id,
                score = search.similarity_score,
                "Scored tailored CV"
            );
            Some(search)
        }
        Ok(None) => None,
        Err(e) => {
            warn!(cv_id = cv.id, "Failed to generate similarity score for tailored CV: {e}");
            None
        }
    }
}

async fn try_score(
    store: &dyn Store,
    scorer: &dyn SimilarityScorer,
    cv: &CvRow,
    after: &CvDataRow,
) -> Result<Option<JobSearchRow>, AppError> {
    let Some(job_id) = cv.job_id else {
        return Ok(None);
    };
    let Some(job) = store.get_job(job_id).await? else {
        return Ok(None);
    };

    let Some(base_cv) = store.find_base_cv(cv.candidate_id).await? else {
        debug!(cv_id = cv.id, "No base CV, skipping tailored scoring");
        return Ok(None);
    };
    if store.get_cv_data(base_cv.id).await?.is_none() {
        debug!(cv_id = cv.id, "Base CV has no data, skipping tailored scoring");
        return Ok(None);
    }

    let profile = build_candidate_profile(after);
    let score = scorer.score(&profile, &JobSummary::from_job(&job)).await?;

    let base_score = store
        .get_job_search(base_cv.id, job.id)
        .await?
        .map(|s| s.similarity_score);
    let score = apply_improvement_bias(base_score, score);

    let search = record_similarity_score(store, cv.id, job.id, score).await?;
    Ok(Some(search))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cv::{CvDataInput, CvType, NewCv};
    use crate::models::job::JobInput;
    use crate::models::DbId;
    use crate::similarity::scorer::testing::FixedScorer;
    use crate::store::memory::MemoryStore;

    struct Fixture {
        store: MemoryStore,
        base: CvRow,
        tailored: CvRow,
        job_id: DbId,
    }

    async fn fixture(with_base_data: bool) -> Fixture {
        let store = MemoryStore::new();
        let candidate = store.add_candidate();
        let job = store
            .insert_job(&JobInput {
                title: Some("Backend Engineer".to_string()),
                job_type: "full-time".to_string(),
                job_id: Some("ext-1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let base = store
            .insert_cv(&NewCv {
                candidate_id: candidate.id,
                cv_type: CvType::Base,
                name: Some("Base".to_string()),
                original_file: None,
                template_id: None,
                job_id: None,
                career_id: None,
            })
            .await
            .unwrap()
            .cv;
        if with_base_data {
            store
                .insert_cv_data(base.id, &CvDataInput::default())
                .await
                .unwrap();
        }
        let tailored = store
            .insert_cv(&NewCv {
                candidate_id: candidate.id,
                cv_type: CvType::Tailored,
                name: Some("Tailored".to_string()),
                original_file: None,
                template_id: None,
                job_id: Some(job.id),
                career_id: None,
            })
            .await
            .unwrap()
            .cv;
        Fixture {
            store,
            base,
            tailored,
            job_id: job.id,
        }
    }

    async fn before_and_after(f: &Fixture, before: CvDataInput) -> (CvDataRow, CvDataRow) {
        let before = f.store.insert_cv_data(f.tailored.id, &before).await.unwrap();
        let after = f
            .store
            .update_cv_data(
                f.tailored.id,
                &CvDataInput {
                    name: Some("Ada".to_string()),
                    email: Some("ada@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        (before, after)
    }

    #[tokio::test]
    async fn test_scores_first_fill_of_tailored_cv() {
        let f = fixture(true).await;
        let (before, after) = before_and_after(&f, CvDataInput::default()).await;
        let scorer = FixedScorer::returning(77.0);

        let search = score_tailored_cv(&f.store, Some(&scorer), &f.tailored, &before, &after)
            .await
            .unwrap();
        assert_eq!(search.cv_id, f.tailored.id);
        assert_eq!(search.job_id, f.job_id);
        assert_eq!(search.similarity_score, 77.0);
    }

    #[tokio::test]
    async fn test_bias_lifts_score_above_base_cv() {
        let f = fixture(true).await;
        f.store.seed_job_search(f.base.id, f.job_id, 80.0);
        let (before, after) = before_and_after(&f, CvDataInput::default()).await;
        let scorer = FixedScorer::returning(70.0);

        let search = score_tailored_cv(&f.store, Some(&scorer), &f.tailored, &before, &after)
            .await
            .unwrap();
        assert_eq!(search.similarity_score, 85.0);
    }

    #[tokio::test]
    async fn test_skipped_when_previous_data_had_content() {
        let f = fixture(true).await;
        let (before, after) = before_and_after(
            &f,
            CvDataInput {
                title: Some("Existing".to_string()),
                ..Default::default()
            },
        )
        .await;
        let scorer = FixedScorer::returning(50.0);

        let result = score_tailored_cv(&f.store, Some(&scorer), &f.tailored, &before, &after).await;
        assert!(result.is_none());
        assert_eq!(scorer.call_count(), 0);
    }

    #[tokio::test]
    async fn test_skipped_for_base_cv() {
        let f = fixture(true).await;
        let (before, after) = before_and_after(&f, CvDataInput::default()).await;
        let scorer = FixedScorer::returning(50.0);

        let result = score_tailored_cv(&f.store, Some(&scorer), &f.base, &before, &after).await;
        assert!(result.is_none());
        assert_eq!(scorer.call_count(), 0);
    }

    #[tokio::test]
    async fn test_skipped_without_base_cv_data() {
        let f = fixture(false).await;
        let (before, after) = before_and_after(&f, CvDataInput::default()).await;
        let scorer = FixedScorer::returning(50.0);

        let result = score_tailored_cv(&f.store, Some(&scorer), &f.tailored, &before, &after).await;
        assert!(result.is_none());
        assert_eq!(scorer.call_count(), 0);
    }

    #[tokio::test]
    async fn test_scorer_failure_is_swallowed() {
        let f = fixture(true).await;
        let (before, after) = before_and_after(&f, CvDataInput::default()).await;
        let scorer = FixedScorer::failing();

        let result = score_tailored_cv(&f.store, Some(&scorer), &f.tailored, &before, &after).await;
        assert!(result.is_none());
        assert_eq!(scorer.call_count(), 1);
        assert!(f
            .store
            .get_job_search(f.tailored.id, f.job_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_disabled_scorer_skips() {
        let f = fixture(true).await;
        let (before, after) = before_and_after(&f, CvDataInput::default()).await;

        assert!(score_tailored_cv(&f.store, None, &f.tailored, &before, &after)
            .await
            .is_none());
    }
}

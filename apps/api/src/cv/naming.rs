//! Display names for CVs created without one.

use thiserror::Error;

use super::language::{detect_cv_language, LanguageDetector};
use crate::errors::AppError;
use crate::models::career::CareerTranslationRow;
use crate::models::cv::{CvRow, CvType};
use crate::models::job::JobRow;
use crate::models::DbId;
use crate::store::Store;

pub const UNTITLED: &str = "Untitled";
pub const UNTITLED_TAILORED: &str = "Untitled - Tailored CV";

/// Language assumed for career titles when the base CV gives no signal.
const FALLBACK_LANGUAGE: &str = "en";

#[derive(Debug, Error)]
pub enum NamingError {
    #[error("unknown CV type '{0}'")]
    UnknownCvType(String),

    #[error("job {0} not found")]
    MissingJob(DbId),

    #[error("base CV {0} has no CV data")]
    MissingBaseCvData(DbId),

    #[error(transparent)]
    Store(#[from] AppError),
}

pub fn base_cv_name(title: Option<&str>) -> String {
    let title = title.filter(|t| !t.is_empty()).unwrap_or(UNTITLED);
    format!("{title} - Base CV")
}

pub fn job_cv_name(job: &JobRow) -> String {
    let title = job
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or("Untitled Job");
    let company = job
        .company_name
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or("Unknown Company");
    format!("{title} - {company}")
}

pub fn career_cv_name(translation: Option<&CareerTranslationRow>) -> String {
    match translation {
        Some(t) => format!("{} - Tailored CV", t.title),
        None => UNTITLED.to_string(),
    }
}

/// Derives the name of a freshly inserted CV from its data, job or career.
pub async fn derive_cv_name(
    store: &dyn Store,
    detector: &dyn LanguageDetector,
    cv: &CvRow,
) -> Result<String, NamingError> {
    match CvType::parse(&cv.cv_type) {
        Some(CvType::Base) => {
            let data = store.get_cv_data(cv.id).await?;
            Ok(base_cv_name(data.as_ref().and_then(|d| d.title.as_deref())))
        }
        Some(CvType::Tailored) => {
            if let Some(job_id) = cv.job_id {
                let job = store
                    .get_job(job_id)
                    .await?
                    .ok_or(NamingError::MissingJob(job_id))?;
                return Ok(job_cv_name(&job));
            }

            let Some(career_id) = cv.career_id else {
                return Ok(UNTITLED_TAILORED.to_string());
            };

            let Some(base_cv) = store.find_base_cv(cv.candidate_id).await? else {
                return Ok(UNTITLED_TAILORED.to_string());
            };
            let base_data = store
                .get_cv_data(base_cv.id)
                .await?
                .ok_or(NamingError::MissingBaseCvData(base_cv.id))?;

            let lang = detect_cv_language(detector, base_data.work.as_ref())
                .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string());
            let translation = store.find_career_translation(career_id, &lang).await?;
            Ok(career_cv_name(translation.as_ref()))
        }
        None => Err(NamingError::UnknownCvType(cv.cv_type.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cv::language::testing::PrefixDetector;
    use crate::cv::language::WhatlangDetector;
    use crate::models::cv::{CvDataInput, NewCv};
    use crate::models::job::JobInput;
    use crate::store::memory::MemoryStore;
    use serde_json::json;

    fn job(title: Option<&str>, company: Option<&str>) -> JobInput {
        JobInput {
            title: title.map(String::from),
            company_name: company.map(String::from),
            job_type: "full-time".to_string(),
            ..Default::default()
        }
    }

    async fn insert(store: &MemoryStore, new: NewCv) -> CvRow {
        store.insert_cv(&new).await.unwrap().cv
    }

    fn tailored(candidate_id: DbId) -> NewCv {
        NewCv {
            candidate_id,
            cv_type: CvType::Tailored,
            name: None,
            original_file: None,
            template_id: None,
            job_id: None,
            career_id: None,
        }
    }

    #[test]
    fn test_base_name_falls_back_to_untitled() {
        assert_eq!(base_cv_name(None), "Untitled - Base CV");
        assert_eq!(base_cv_name(Some("")), "Untitled - Base CV");
        assert_eq!(base_cv_name(Some("Data Engineer")), "Data Engineer - Base CV");
    }

    #[tokio::test]
    async fn test_job_name_uses_placeholders_for_missing_parts() {
        let store = MemoryStore::new();
        let candidate = store.add_candidate();
        let job = store.insert_job(&job(None, Some("Acme"))).await.unwrap();
        let cv = insert(
            &store,
            NewCv {
                job_id: Some(job.id),
                ..tailored(candidate.id)
            },
        )
        .await;

        let name = derive_cv_name(&store, &PrefixDetector, &cv).await.unwrap();
        assert_eq!(name, "Untitled Job - Acme");
    }

    #[tokio::test]
    async fn test_career_name_without_base_cv() {
        let store = MemoryStore::new();
        let candidate = store.add_candidate();
        let career = store.add_career("data", &[("en", "Data Scientist")]);
        let cv = insert(
            &store,
            NewCv {
                career_id: Some(career.id),
                ..tailored(candidate.id)
            },
        )
        .await;

        let name = derive_cv_name(&store, &PrefixDetector, &cv).await.unwrap();
        assert_eq!(name, "Untitled - Tailored CV");
    }

    #[tokio::test]
    async fn test_career_name_follows_base_cv_language() {
        let store = MemoryStore::new();
        let candidate = store.add_candidate();
        let career = store.add_career(
            "data",
            &[("en", "Data Scientist"), ("fr", "Scientifique des données")],
        );
        let base = insert(
            &store,
            NewCv {
                cv_type: CvType::Base,
                ..tailored(candidate.id)
            },
        )
        .await;
        store
            .insert_cv_data(
                base.id,
                &CvDataInput {
                    work: Some(json!([{"responsibilities": "fr Analyse de données"}])),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let cv = insert(
            &store,
            NewCv {
                career_id: Some(career.id),
                ..tailored(candidate.id)
            },
        )
        .await;

        let name = derive_cv_name(&store, &PrefixDetector, &cv).await.unwrap();
        assert_eq!(name, "Scientifique des données - Tailored CV");
    }

    #[tokio::test]
    async fn test_career_name_without_translation_is_untitled() {
        let store = MemoryStore::new();
        let candidate = store.add_candidate();
        let career = store.add_career("data", &[("fr", "Scientifique des données")]);
        let base = insert(
            &store,
            NewCv {
                cv_type: CvType::Base,
                ..tailored(candidate.id)
            },
        )
        .await;
        // No detectable work text: falls back to English, which has no translation.
        store
            .insert_cv_data(base.id, &CvDataInput::default())
            .await
            .unwrap();
        let cv = insert(
            &store,
            NewCv {
                career_id: Some(career.id),
                ..tailored(candidate.id)
            },
        )
        .await;

        let name = derive_cv_name(&store, &PrefixDetector, &cv).await.unwrap();
        assert_eq!(name, "Untitled");
    }

    #[tokio::test]
    async fn test_career_name_falls_back_to_english_on_short_work_text() {
        let store = MemoryStore::new();
        let candidate = store.add_candidate();
        let career = store.add_career("data", &[("en", "Data Scientist")]);
        let base = insert(
            &store,
            NewCv {
                cv_type: CvType::Base,
                ..tailored(candidate.id)
            },
        )
        .await;
        store
            .insert_cv_data(
                base.id,
                &CvDataInput {
                    work: Some(json!([{"responsibilities": "Managed budgets"}])),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let cv = insert(
            &store,
            NewCv {
                career_id: Some(career.id),
                ..tailored(candidate.id)
            },
        )
        .await;

        let name = derive_cv_name(&store, &WhatlangDetector, &cv).await.unwrap();
        assert_eq!(name, "Data Scientist - Tailored CV");
    }

    #[tokio::test]
    async fn test_career_name_fails_when_base_cv_has_no_data() {
        let store = MemoryStore::new();
        let candidate = store.add_candidate();
        let career = store.add_career("data", &[("en", "Data Scientist")]);
        insert(
            &store,
            NewCv {
                cv_type: CvType::Base,
                ..tailored(candidate.id)
            },
        )
        .await;
        let cv = insert(
            &store,
            NewCv {
                career_id: Some(career.id),
                ..tailored(candidate.id)
            },
        )
        .await;

        let result = derive_cv_name(&store, &PrefixDetector, &cv).await;
        assert!(matches!(result, Err(NamingError::MissingBaseCvData(_))));
    }
}

//! Bulk job import from scraper CSV exports.
//!
//! Rows are applied one at a time. A row that fails to parse is reported and
//! the rest of the file still imports; a storage failure aborts the import.

use std::io::Read;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::job::JobInput;
use crate::models::DbId;
use crate::store::Store;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
const DEFAULT_JOB_TYPE: &str = "full-time";

/// Column order shared by import and export.
pub const JOB_COLUMNS: [&str; 20] = [
    "title",
    "description",
    "requirements",
    "company_name",
    "company_logo",
    "company_size",
    "location",
    "linkedin_profiles",
    "employment_type",
    "original_url",
    "salary_range",
    "min_salary",
    "max_salary",
    "benefits",
    "skills_required",
    "posted_date",
    "expiration_date",
    "industry",
    "job_type",
    "job_id",
];

#[derive(Debug, Error, PartialEq)]
pub enum ImportRowError {
    #[error("invalid date for {field}: '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    #[error("invalid number for {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("malformed CSV row: {0}")]
    Malformed(String),
}

/// One CSV record as text. Unknown columns are ignored, missing ones are empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawJobRow {
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub company_name: String,
    pub company_logo: String,
    pub company_size: String,
    pub location: String,
    pub linkedin_profiles: String,
    pub employment_type: String,
    pub original_url: String,
    pub salary_range: String,
    pub min_salary: String,
    pub max_salary: String,
    pub benefits: String,
    pub skills_required: String,
    pub posted_date: String,
    pub expiration_date: String,
    pub industry: String,
    pub job_type: String,
    pub job_id: String,
}

fn text(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// JSON columns hold either a JSON document or plain text.
fn json(value: String) -> Option<Value> {
    let value = text(value)?;
    Some(serde_json::from_str(&value).unwrap_or(Value::String(value)))
}

fn date(field: &'static str, value: &str) -> Result<Option<NaiveDate>, ImportRowError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(Some)
        .map_err(|_| ImportRowError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

fn number<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
) -> Result<Option<T>, ImportRowError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| ImportRowError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

pub fn parse_row(raw: RawJobRow) -> Result<JobInput, ImportRowError> {
    let company_size = number::<i32>("company_size", &raw.company_size)?;
    let min_salary = number::<f64>("min_salary", &raw.min_salary)?;
    let max_salary = number::<f64>("max_salary", &raw.max_salary)?;
    let posted_date = date("posted_date", &raw.posted_date)?;
    let expiration_date = date("expiration_date", &raw.expiration_date)?;

    Ok(JobInput {
        title: text(raw.title),
        description: raw.description,
        requirements: json(raw.requirements),
        company_name: text(raw.company_name),
        company_logo: text(raw.company_logo),
        company_size,
        location: text(raw.location),
        linkedin_profiles: json(raw.linkedin_profiles),
        employment_type: text(raw.employment_type),
        original_url: raw.original_url,
        salary_range: text(raw.salary_range),
        min_salary,
        max_salary,
        benefits: json(raw.benefits),
        skills_required: json(raw.skills_required),
        posted_date,
        expiration_date,
        industry: text(raw.industry),
        job_type: text(raw.job_type).unwrap_or_else(|| DEFAULT_JOB_TYPE.to_string()),
        job_id: text(raw.job_id),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportDecision {
    SkipMissingJobId,
    SkipDuplicateJobId,
    /// An identical listing exists and is at least as recent.
    SkipNotNewer(DbId),
    Update(DbId),
    Create,
}

pub async fn decide(store: &dyn Store, job: &JobInput) -> Result<ImportDecision, AppError> {
    let Some(job_id) = job.job_id.as_deref() else {
        return Ok(ImportDecision::SkipMissingJobId);
    };
    if store.find_job_by_external_id(job_id).await?.is_some() {
        return Ok(ImportDecision::SkipDuplicateJobId);
    }

    let existing = store
        .find_job_by_identity(
            job.title.as_deref(),
            job.company_name.as_deref(),
            job.location.as_deref(),
        )
        .await?;

    let decision = match existing {
        Some(existing) => match (job.posted_date, existing.posted_date) {
            (Some(incoming), Some(current)) if incoming > current => {
                ImportDecision::Update(existing.id)
            }
            (Some(_), Some(_)) => ImportDecision::SkipNotNewer(existing.id),
            _ => ImportDecision::Create,
        },
        None => ImportDecision::Create,
    };
    Ok(decision)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Created,
    Updated,
    Skipped,
    Invalid,
}

#[derive(Debug, Serialize)]
pub struct RowOutcome {
    /// 1-based line in the file, counting the header.
    pub line: u64,
    pub status: RowStatus,
    pub job_id: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct ImportReport {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub invalid: usize,
    pub rows: Vec<RowOutcome>,
}

impl ImportReport {
    fn push(
        &mut self,
        line: u64,
        status: RowStatus,
        job_id: Option<String>,
        message: Option<String>,
    ) {
        match status {
            RowStatus::Created => self.created += 1,
            RowStatus::Updated => self.updated += 1,
            RowStatus::Skipped => self.skipped += 1,
            RowStatus::Invalid => self.invalid += 1,
        }
        self.rows.push(RowOutcome {
            line,
            status,
            job_id,
            message,
        });
    }
}

pub async fn import_jobs<R: Read>(store: &dyn Store, reader: R) -> Result<ImportReport, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let mut report = ImportReport::default();
    for (index, record) in csv_reader.deserialize::<RawJobRow>().enumerate() {
        let line = index as u64 + 2;

        let job = match record
            .map_err(|e| ImportRowError::Malformed(e.to_string()))
            .and_then(parse_row)
        {
            Ok(job) => job,
            Err(e) => {
                warn!(line, "Rejected job import row: {e}");
                report.push(line, RowStatus::Invalid, None, Some(e.to_string()));
                continue;
            }
        };

        let external_id = job.job_id.clone();
        match decide(store, &job).await? {
            ImportDecision::SkipMissingJobId => {
                warn!(line, "Skipping row with missing job_id");
                report.push(line, RowStatus::Skipped, None, Some("missing job_id".into()));
            }
            ImportDecision::SkipDuplicateJobId => {
                info!(line, job_id = ?external_id, "Skipping duplicate job_id");
                report.push(
                    line,
                    RowStatus::Skipped,
                    external_id,
                    Some("job_id already imported".into()),
                );
            }
            ImportDecision::SkipNotNewer(existing) => {
                info!(line, existing, "Skipping row, existing job is newer or equal");
                report.push(
                    line,
                    RowStatus::Skipped,
                    external_id,
                    Some(format!("job {existing} is newer or equal")),
                );
            }
            ImportDecision::Update(existing) => {
                store.update_job(existing, &job).await?;
                info!(line, existing, "Updated existing job from import");
                report.push(line, RowStatus::Updated, external_id, None);
            }
            ImportDecision::Create => {
                store.insert_job(&job).await?;
                report.push(line, RowStatus::Created, external_id, None);
            }
        }
    }

    info!(
        created = report.created,
        updated = report.updated,
        skipped = report.skipped,
        invalid = report.invalid,
        "Job import finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    const HEADER: &str = "title,company_name,location,posted_date,min_salary,job_id,description";

    fn csv(rows: &[&str]) -> String {
        let mut out = HEADER.to_string();
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out
    }

    fn existing(job_id: &str, posted: &str) -> JobInput {
        JobInput {
            title: Some("Engineer".to_string()),
            company_name: Some("Acme".to_string()),
            location: Some("Paris".to_string()),
            posted_date: NaiveDate::parse_from_str(posted, DATE_FORMAT).ok(),
            job_type: DEFAULT_JOB_TYPE.to_string(),
            job_id: Some(job_id.to_string()),
            description: "old".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_row_normalises_empty_values() {
        let job = parse_row(RawJobRow {
            title: "Engineer".to_string(),
            company_size: String::new(),
            min_salary: " ".to_string(),
            posted_date: String::new(),
            skills_required: "[\"rust\"]".to_string(),
            benefits: "Remote work".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(job.company_size, None);
        assert_eq!(job.min_salary, None);
        assert_eq!(job.posted_date, None);
        assert_eq!(job.job_type, "full-time");
        assert_eq!(job.skills_required, Some(serde_json::json!(["rust"])));
        assert_eq!(job.benefits, Some(Value::String("Remote work".into())));
    }

    #[test]
    fn test_parse_row_rejects_malformed_date() {
        let err = parse_row(RawJobRow {
            posted_date: "12/03/2024".to_string(),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ImportRowError::InvalidDate {
                field: "posted_date",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_existing_job_id_is_skipped_without_changes() {
        let store = MemoryStore::new();
        let job = store.insert_job(&existing("ext-1", "2024-01-01")).await.unwrap();

        let report = import_jobs(
            &store,
            csv(&["Other,Other Co,Lyon,2025-01-01,,ext-1,new"]).as_bytes(),
        )
        .await
        .unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(store.job_count(), 1);
        let stored = store.get_job(job.id).await.unwrap().unwrap();
        assert_eq!(stored.description, "old");
    }

    #[tokio::test]
    async fn test_newer_identical_listing_updates_in_place() {
        let store = MemoryStore::new();
        let job = store.insert_job(&existing("ext-1", "2024-01-01")).await.unwrap();

        let report = import_jobs(
            &store,
            csv(&["Engineer,Acme,Paris,2024-02-01,45000,ext-2,new"]).as_bytes(),
        )
        .await
        .unwrap();

        assert_eq!(report.updated, 1);
        assert_eq!(store.job_count(), 1);
        let stored = store.get_job(job.id).await.unwrap().unwrap();
        assert_eq!(stored.description, "new");
        assert_eq!(stored.min_salary, Some(45000.0));
        assert_eq!(stored.job_id.as_deref(), Some("ext-2"));
    }

    #[tokio::test]
    async fn test_older_or_equal_listing_is_skipped() {
        let store = MemoryStore::new();
        store.insert_job(&existing("ext-1", "2024-01-01")).await.unwrap();

        let report = import_jobs(
            &store,
            csv(&[
                "Engineer,Acme,Paris,2024-01-01,,ext-2,same day",
                "Engineer,Acme,Paris,2023-06-01,,ext-3,older",
            ])
            .as_bytes(),
        )
        .await
        .unwrap();

        assert_eq!(report.skipped, 2);
        assert_eq!(store.job_count(), 1);
    }

    #[tokio::test]
    async fn test_identity_match_without_dates_creates_new_job() {
        let store = MemoryStore::new();
        store.insert_job(&existing("ext-1", "2024-01-01")).await.unwrap();

        let report = import_jobs(
            &store,
            csv(&["Engineer,Acme,Paris,,,ext-2,undated"]).as_bytes(),
        )
        .await
        .unwrap();

        assert_eq!(report.created, 1);
        assert_eq!(store.job_count(), 2);
    }

    #[tokio::test]
    async fn test_bad_row_does_not_block_the_rest() {
        let store = MemoryStore::new();

        let report = import_jobs(
            &store,
            csv(&[
                "Engineer,Acme,Paris,not-a-date,,ext-1,bad",
                "Designer,Acme,Paris,2024-03-01,,ext-2,good",
                "Designer,Acme,Lyon,2024-03-01,,,no id",
            ])
            .as_bytes(),
        )
        .await
        .unwrap();

        assert_eq!(report.invalid, 1);
        assert_eq!(report.created, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.rows[0].line, 2);
        assert_eq!(report.rows[0].status, RowStatus::Invalid);
        assert_eq!(store.job_count(), 1);
    }
}

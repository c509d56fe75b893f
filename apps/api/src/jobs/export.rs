use serde_json::Value;

use super::import::{DATE_FORMAT, JOB_COLUMNS};
use crate::errors::AppError;
use crate::models::job::JobRow;

fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// Plain strings are written bare so they re-import as the same value.
fn json_cell(value: &Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn record(job: &JobRow) -> [String; 20] {
    let date = |d: &Option<chrono::NaiveDate>| {
        d.map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    };
    [
        opt(&job.title),
        job.description.clone(),
        json_cell(&job.requirements),
        opt(&job.company_name),
        opt(&job.company_logo),
        opt(&job.company_size),
        opt(&job.location),
        json_cell(&job.linkedin_profiles),
        opt(&job.employment_type),
        job.original_url.clone(),
        opt(&job.salary_range),
        opt(&job.min_salary),
        opt(&job.max_salary),
        json_cell(&job.benefits),
        json_cell(&job.skills_required),
        date(&job.posted_date),
        date(&job.expiration_date),
        opt(&job.industry),
        job.job_type.clone(),
        opt(&job.job_id),
    ]
}

/// Serializes jobs to CSV with the import column layout.
pub fn export_jobs(jobs: &[JobRow]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(JOB_COLUMNS)
        .map_err(|e| AppError::Internal(e.into()))?;
    for job in jobs {
        writer
            .write_record(record(job))
            .map_err(|e| AppError::Internal(e.into()))?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("CSV flush failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::import::import_jobs;
    use crate::models::job::JobInput;
    use crate::store::memory::MemoryStore;
    use crate::store::Store;
    use chrono::NaiveDate;
    use serde_json::json;

    #[tokio::test]
    async fn test_export_reimports_into_empty_store() {
        let source = MemoryStore::new();
        source
            .insert_job(&JobInput {
                title: Some("Engineer, Backend".to_string()),
                company_name: Some("Acme".to_string()),
                min_salary: Some(42000.5),
                skills_required: Some(json!(["rust", "sql"])),
                benefits: Some(json!("Remote")),
                posted_date: NaiveDate::from_ymd_opt(2024, 5, 2),
                job_type: "contract".to_string(),
                job_id: Some("ext-9".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let bytes = export_jobs(&source.list_all_jobs().await.unwrap()).unwrap();
        let header = String::from_utf8(bytes.clone()).unwrap();
        assert!(header.starts_with("title,description,requirements,company_name"));

        let target = MemoryStore::new();
        let report = import_jobs(&target, bytes.as_slice()).await.unwrap();
        assert_eq!(report.created, 1);

        let job = target.find_job_by_external_id("ext-9").await.unwrap().unwrap();
        assert_eq!(job.title.as_deref(), Some("Engineer, Backend"));
        assert_eq!(job.min_salary, Some(42000.5));
        assert_eq!(job.skills_required, Some(json!(["rust", "sql"])));
        assert_eq!(job.benefits, Some(json!("Remote")));
        assert_eq!(job.posted_date, NaiveDate::from_ymd_opt(2024, 5, 2));
        assert_eq!(job.job_type, "contract");
    }
}

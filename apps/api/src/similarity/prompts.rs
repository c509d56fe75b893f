use serde::Serialize;
use serde_json::Value;

use crate::models::cv::CvDataRow;
use crate::models::job::JobRow;
use crate::models::DbId;

pub const SIMILARITY_SYSTEM: &str = "You are an experienced technical recruiter. \
    You score how well a candidate matches job offers. \
    You MUST respond with a JSON array only, one object per job, \
    shaped as {\"id\": <job id>, \"score\": <integer from 0 to 100>}.";

/// The job fields the model sees.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub id: DbId,
    pub title: Option<String>,
    pub description: String,
    pub requirements: String,
    pub skills: String,
}

impl JobSummary {
    pub fn from_job(job: &JobRow) -> Self {
        Self {
            id: job.id,
            title: job.title.clone(),
            description: job.description.clone(),
            requirements: join_list(job.requirements.as_ref()),
            skills: join_list(job.skills_required.as_ref()),
        }
    }
}

/// Joins a JSON list of strings with ", ". Non-string items are rendered as JSON.
fn join_list(value: Option<&Value>) -> String {
    let Some(items) = value.and_then(Value::as_array) else {
        return String::new();
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn push_field(out: &mut String, label: &str, value: Option<&str>) {
    if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
        out.push_str(&format!("{label}: {v}\n"));
    }
}

fn push_json(out: &mut String, label: &str, value: Option<&Value>) {
    match value {
        Some(Value::Null) | None => {}
        Some(Value::Array(items)) if items.is_empty() => {}
        Some(v) => out.push_str(&format!("{label}: {v}\n")),
    }
}

/// Flattens CV content into the profile text sent to the model.
pub fn build_candidate_profile(data: &CvDataRow) -> String {
    let mut out = String::new();
    push_field(&mut out, "Headline", data.headline.as_deref());
    push_field(&mut out, "Summary", data.summary.as_deref());
    push_field(&mut out, "Years of experience", data.yoe.as_deref());
    push_field(&mut out, "City", data.city.as_deref());
    push_json(&mut out, "Work experience", data.work.as_ref());
    push_json(&mut out, "Education", data.educations.as_ref());
    push_json(&mut out, "Skills", data.skills.as_ref());
    push_json(&mut out, "Languages", data.languages.as_ref());
    push_json(&mut out, "Certifications", data.certifications.as_ref());
    push_json(&mut out, "Projects", data.projects.as_ref());
    out
}

pub fn build_similarity_prompt(profile: &str, jobs: &[JobSummary]) -> String {
    let jobs_json = serde_json::to_string_pretty(jobs).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Candidate profile:\n{profile}\n\
         Job offers:\n{jobs_json}\n\n\
         For each job offer, estimate how well the candidate fits it. \
         Weigh required skills and requirements most, then title and description. \
         Return one entry per job id."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn cv_data() -> CvDataRow {
        CvDataRow {
            id: 1,
            cv_id: 1,
            title: None,
            name: Some("Ada".to_string()),
            email: None,
            phone: None,
            age: None,
            city: None,
            yoe: Some("5".to_string()),
            work: Some(json!([{"company": "Acme", "responsibilities": "Built pipelines"}])),
            educations: None,
            languages: None,
            skills: Some(json!(["Rust", "SQL"])),
            interests: None,
            social: None,
            certifications: None,
            projects: Some(json!([])),
            volunteering: None,
            references: None,
            headline: Some("Data Engineer".to_string()),
            summary: Some("  ".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_profile_skips_empty_sections() {
        let profile = build_candidate_profile(&cv_data());
        assert!(profile.contains("Headline: Data Engineer"));
        assert!(profile.contains("Skills: [\"Rust\",\"SQL\"]"));
        assert!(!profile.contains("Summary"));
        assert!(!profile.contains("Projects"));
    }

    #[test]
    fn test_join_list() {
        assert_eq!(join_list(Some(&json!(["Rust", "SQL"]))), "Rust, SQL");
        assert_eq!(join_list(Some(&json!([1, "two"]))), "1, two");
        assert_eq!(join_list(Some(&json!("not a list"))), "");
        assert_eq!(join_list(None), "");
    }

    #[test]
    fn test_prompt_embeds_job_ids() {
        let prompt = build_similarity_prompt(
            "Headline: X",
            &[JobSummary {
                id: 42,
                title: Some("Backend".to_string()),
                description: String::new(),
                requirements: "Rust".to_string(),
                skills: String::new(),
            }],
        );
        assert!(prompt.contains("\"id\": 42"));
        assert!(prompt.starts_with("Candidate profile:\nHeadline: X"));
    }
}

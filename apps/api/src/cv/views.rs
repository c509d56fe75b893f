//! Response shapes for CVs, their data and templates.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::language::{detect_cv_language, LanguageDetector};
use crate::careers::CareerView;
use crate::jobs::views::JobView;
use crate::models::cv::{AbstractTemplateRow, CvDataRow, CvRow, TemplateRow};
use crate::models::DbId;

fn list_or_empty(value: Option<Value>) -> Value {
    match value {
        None | Some(Value::Null) => Value::Array(Vec::new()),
        Some(v) => v,
    }
}

/// CV content. `title` mirrors the headline; missing lists render as `[]`.
#[derive(Debug, Serialize)]
pub struct CvDataView {
    pub cv_id: DbId,
    pub title: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub city: Option<String>,
    pub work: Value,
    pub educations: Value,
    pub languages: Value,
    pub skills: Value,
    pub interests: Value,
    pub social: Value,
    pub certifications: Value,
    pub projects: Value,
    pub volunteering: Value,
    pub references: Value,
    pub headline: Option<String>,
    pub summary: Option<String>,
}

impl From<CvDataRow> for CvDataView {
    fn from(data: CvDataRow) -> Self {
        Self {
            cv_id: data.cv_id,
            title: data.headline.clone(),
            name: data.name,
            email: data.email,
            phone: data.phone,
            age: data.age,
            city: data.city,
            work: list_or_empty(data.work),
            educations: list_or_empty(data.educations),
            languages: list_or_empty(data.languages),
            skills: list_or_empty(data.skills),
            interests: list_or_empty(data.interests),
            social: list_or_empty(data.social),
            certifications: list_or_empty(data.certifications),
            projects: list_or_empty(data.projects),
            volunteering: list_or_empty(data.volunteering),
            references: list_or_empty(data.references),
            headline: data.headline,
            summary: data.summary,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TemplateView {
    pub id: DbId,
    pub name: Option<String>,
    pub language: Option<String>,
    pub reference: Option<String>,
    pub identity: Option<String>,
    #[serde(rename = "templateData")]
    pub template_data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TemplateView {
    pub fn new(template: TemplateRow, design: Option<&AbstractTemplateRow>) -> Self {
        let name = design.map(|d| d.name.clone());
        let reference = design.and_then(|d| d.reference.clone());
        let template_data = json!({
            "identity": reference,
            "template": name,
            "company_logo": template.company_logo,
            "page": template.page,
            "certifications": template.certifications,
            "education": template.education,
            "experience": template.experience,
            "volunteering": template.volunteering,
            "interests": template.interests,
            "languages": template.languages,
            "projects": template.projects,
            "references": template.references,
            "skills": template.skills,
            "social": template.social,
            "theme": template.theme,
            "personnel": template.personnel,
            "typography": template.typography,
        });
        Self {
            id: template.id,
            name,
            language: template.language,
            identity: reference.clone(),
            reference,
            template_data,
            created_at: template.created_at,
            updated_at: template.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CvView {
    pub id: DbId,
    pub uid: Uuid,
    pub name: Option<String>,
    pub original_file: Option<String>,
    pub cv_type: String,
    pub generated_pdf: Option<String>,
    pub thumbnail: Option<String>,
    pub cv_data: Option<CvDataView>,
    pub job: Option<JobView>,
    pub career: Option<CareerView>,
    pub template: Option<TemplateView>,
    /// Dominant language of the work experience.
    pub lang: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Related records loaded alongside a CV.
#[derive(Default)]
pub struct CvRelations {
    pub data: Option<CvDataRow>,
    pub job: Option<JobView>,
    pub career: Option<CareerView>,
    pub template: Option<TemplateView>,
}

impl CvView {
    pub fn new(cv: CvRow, related: CvRelations, detector: &dyn LanguageDetector) -> Self {
        let lang = related
            .data
            .as_ref()
            .and_then(|d| detect_cv_language(detector, d.work.as_ref()));
        Self {
            id: cv.id,
            uid: cv.uid,
            name: cv.name,
            original_file: cv.original_file,
            cv_type: cv.cv_type,
            generated_pdf: cv.generated_pdf,
            thumbnail: cv.thumbnail,
            cv_data: related.data.map(CvDataView::from),
            job: related.job,
            career: related.career,
            template: related.template,
            lang,
            created_at: cv.created_at,
            updated_at: cv.updated_at,
        }
    }
}

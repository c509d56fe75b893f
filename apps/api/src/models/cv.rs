use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::DbId;

pub const CV_TYPE_BASE: &str = "base";
pub const CV_TYPE_TAILORED: &str = "tailored";

/// Languages a template can be rendered in.
pub const TEMPLATE_LANGUAGES: [&str; 2] = ["en", "fr"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CvType {
    Base,
    Tailored,
}

impl CvType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CvType::Base => CV_TYPE_BASE,
            CvType::Tailored => CV_TYPE_TAILORED,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            CV_TYPE_BASE => Some(CvType::Base),
            CV_TYPE_TAILORED => Some(CvType::Tailored),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CvRow {
    pub id: DbId,
    pub uid: Uuid,
    pub candidate_id: DbId,
    pub original_file: Option<String>,
    pub template_id: Option<DbId>,
    pub generated_pdf: Option<String>,
    pub name: Option<String>,
    pub cv_type: String,
    pub job_id: Option<DbId>,
    pub career_id: Option<DbId>,
    pub thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CvRow {
    pub fn is_base(&self) -> bool {
        self.cv_type == CV_TYPE_BASE
    }

    pub fn is_tailored(&self) -> bool {
        self.cv_type == CV_TYPE_TAILORED
    }

    /// True while the CV still carries no name or an auto-generated placeholder.
    pub fn has_placeholder_name(&self) -> bool {
        match self.name.as_deref() {
            None => true,
            Some(name) => name.is_empty() || name.contains("Untitled"),
        }
    }
}

/// Input for inserting a CV row.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCv {
    pub candidate_id: DbId,
    pub cv_type: CvType,
    pub name: Option<String>,
    pub original_file: Option<String>,
    pub template_id: Option<DbId>,
    pub job_id: Option<DbId>,
    pub career_id: Option<DbId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CvDataRow {
    pub id: DbId,
    pub cv_id: DbId,
    pub title: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub city: Option<String>,
    pub yoe: Option<String>,
    pub work: Option<Value>,
    pub educations: Option<Value>,
    pub languages: Option<Value>,
    pub skills: Option<Value>,
    pub interests: Option<Value>,
    pub social: Option<Value>,
    pub certifications: Option<Value>,
    pub projects: Option<Value>,
    pub volunteering: Option<Value>,
    pub references: Option<Value>,
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full replacement payload for a CV's structured content.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CvDataInput {
    pub title: Option<String>,
    pub name: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub city: Option<String>,
    pub yoe: Option<String>,
    pub work: Option<Value>,
    pub educations: Option<Value>,
    pub languages: Option<Value>,
    pub skills: Option<Value>,
    pub interests: Option<Value>,
    pub social: Option<Value>,
    pub certifications: Option<Value>,
    pub projects: Option<Value>,
    pub volunteering: Option<Value>,
    pub references: Option<Value>,
    pub headline: Option<String>,
    pub summary: Option<String>,
}

impl CvDataInput {
    /// Builds an input from a raw JSON payload, turning empty strings into nulls.
    pub fn from_payload(mut payload: Value) -> Result<Self, serde_json::Error> {
        if let Some(fields) = payload.as_object_mut() {
            for value in fields.values_mut() {
                if value.as_str() == Some("") {
                    *value = Value::Null;
                }
            }
        }
        serde_json::from_value(payload)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AbstractTemplateRow {
    pub id: DbId,
    pub name: String,
    pub reference: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TemplateRow {
    pub id: DbId,
    pub language: Option<String>,
    pub abstract_template_id: Option<DbId>,
    pub company_logo: Value,
    pub page: Value,
    pub certifications: Value,
    pub education: Value,
    pub experience: Value,
    pub volunteering: Value,
    pub interests: Value,
    pub languages: Value,
    pub projects: Value,
    pub references: Value,
    pub skills: Value,
    pub social: Value,
    pub theme: Value,
    pub personnel: Value,
    pub typography: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Visual sections of a template, in storage order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTemplate {
    pub language: Option<String>,
    pub abstract_template_id: Option<DbId>,
    pub company_logo: Value,
    pub page: Value,
    pub certifications: Value,
    pub education: Value,
    pub experience: Value,
    pub volunteering: Value,
    pub interests: Value,
    pub languages: Value,
    pub projects: Value,
    pub references: Value,
    pub skills: Value,
    pub social: Value,
    pub theme: Value,
    pub personnel: Value,
    pub typography: Value,
}

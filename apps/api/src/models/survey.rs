use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::DbId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Text,
    Radio,
    Checkbox,
    Dropdown,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Text => "text",
            QuestionType::Radio => "radio",
            QuestionType::Checkbox => "checkbox",
            QuestionType::Dropdown => "dropdown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(QuestionType::Text),
            "radio" => Some(QuestionType::Radio),
            "checkbox" => Some(QuestionType::Checkbox),
            "dropdown" => Some(QuestionType::Dropdown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnswerSetRow {
    pub id: DbId,
    pub language_id: DbId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AnswerOptionRow {
    pub id: DbId,
    pub answer_set_id: DbId,
    pub text: String,
}

/// A question joined with its language code.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionRow {
    pub id: DbId,
    pub group_identifier: String,
    pub language_id: DbId,
    pub language_code: String,
    pub name: String,
    pub text: String,
    pub description: Option<String>,
    pub question_type: String,
    pub required: bool,
    pub answer_set_id: Option<DbId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateResponseRow {
    pub id: DbId,
    pub candidate_id: DbId,
    pub question_id: DbId,
    pub text_answer: Option<String>,
    pub selected_option_id: Option<DbId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//! Survey rules that do not need the database.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::survey::{AnswerOptionRow, QuestionRow, QuestionType};
use crate::models::DbId;

#[derive(Debug, Error, PartialEq)]
pub enum ResponseValidationError {
    #[error("Only one response type (text, single choice, multiple choices) can be filled.")]
    MultipleResponseTypes,

    #[error("For text-based questions, a text answer must be provided.")]
    TextRequired,

    #[error("For {0}-type questions, you must select a single option.")]
    SingleOptionRequired(&'static str),

    #[error("For checkbox-type questions, you must select at least one option.")]
    OptionsRequired,

    #[error("Option {0} is not a valid answer to this question.")]
    InvalidOption(DbId),

    #[error("Unknown question type '{0}'")]
    UnknownQuestionType(String),
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ResponseInput {
    pub text_answer: Option<String>,
    pub selected_option: Option<DbId>,
    #[serde(default)]
    pub selected_options: Vec<DbId>,
}

impl ResponseInput {
    fn text(&self) -> Option<&str> {
        self.text_answer.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Which options a question accepts, and in which slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "slot", content = "options", rename_all = "snake_case")]
pub enum OptionSlots {
    /// Free-text question: no options apply.
    None,
    Single(Vec<AnswerOptionRow>),
    Multiple(Vec<AnswerOptionRow>),
}

impl OptionSlots {
    pub fn options(&self) -> &[AnswerOptionRow] {
        match self {
            OptionSlots::None => &[],
            OptionSlots::Single(o) | OptionSlots::Multiple(o) => o,
        }
    }
}

/// Options a question accepts, filtered to its own answer set.
pub fn valid_options(question: &QuestionRow, options: &[AnswerOptionRow]) -> OptionSlots {
    let own: Vec<AnswerOptionRow> = match question.answer_set_id {
        Some(set_id) => options
            .iter()
            .filter(|o| o.answer_set_id == set_id)
            .cloned()
            .collect(),
        None => Vec::new(),
    };
    match QuestionType::parse(&question.question_type) {
        Some(QuestionType::Radio | QuestionType::Dropdown) => OptionSlots::Single(own),
        Some(QuestionType::Checkbox) => OptionSlots::Multiple(own),
        Some(QuestionType::Text) | None => OptionSlots::None,
    }
}

pub fn validate_response(
    question: &QuestionRow,
    options: &[AnswerOptionRow],
    input: &ResponseInput,
) -> Result<(), ResponseValidationError> {
    let filled = [
        input.text().is_some(),
        input.selected_option.is_some(),
        !input.selected_options.is_empty(),
    ]
    .into_iter()
    .filter(|f| *f)
    .count();
    if filled > 1 {
        return Err(ResponseValidationError::MultipleResponseTypes);
    }

    let question_type = QuestionType::parse(&question.question_type).ok_or_else(|| {
        ResponseValidationError::UnknownQuestionType(question.question_type.clone())
    })?;

    let allowed: HashSet<DbId> = valid_options(question, options)
        .options()
        .iter()
        .map(|o| o.id)
        .collect();
    let check = |id: DbId| {
        if allowed.contains(&id) {
            Ok(())
        } else {
            Err(ResponseValidationError::InvalidOption(id))
        }
    };

    match question_type {
        QuestionType::Text => {
            if input.text().is_none() {
                return Err(ResponseValidationError::TextRequired);
            }
        }
        QuestionType::Radio | QuestionType::Dropdown => {
            let id = input
                .selected_option
                .ok_or(ResponseValidationError::SingleOptionRequired(
                    question_type.as_str(),
                ))?;
            check(id)?;
        }
        QuestionType::Checkbox => {
            if input.selected_options.is_empty() {
                return Err(ResponseValidationError::OptionsRequired);
            }
            for id in &input.selected_options {
                check(*id)?;
            }
        }
    }
    Ok(())
}

/// Picks the group identifier a question is saved under.
///
/// An explicitly chosen existing identifier wins; a blank one is generated
/// from the question name.
pub fn resolve_group_identifier(
    group_identifier: Option<&str>,
    existing_identifier: Option<&str>,
    name: &str,
) -> String {
    let pick = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(String::from);
    pick(existing_identifier)
        .or_else(|| pick(group_identifier))
        .unwrap_or_else(|| generate_group_identifier(name))
}

fn generate_group_identifier(name: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("group_{}_{}", name.trim().replace(' ', "_"), &suffix[..8])
}

/// 1-based position of a question among those sharing its answer set.
pub fn answer_set_occurrence(question_id: DbId, sibling_ids: &[DbId]) -> Option<usize> {
    let mut ordered = sibling_ids.to_vec();
    ordered.sort_unstable();
    ordered.iter().position(|id| *id == question_id).map(|p| p + 1)
}

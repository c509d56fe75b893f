use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::validation::answer_set_occurrence;
use crate::models::survey::{AnswerOptionRow, CandidateResponseRow, QuestionRow};
use crate::models::DbId;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionView {
    pub id: DbId,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: DbId,
    pub group_identifier: String,
    /// Language code, not id.
    pub language: String,
    pub name: String,
    pub text: String,
    pub description: Option<String>,
    pub question_type: String,
    pub required: bool,
    pub answer_set_id: Option<DbId>,
    pub answer_set_occurrence: Option<usize>,
    pub answer_set_options: Option<Vec<OptionView>>,
}

/// Answer-set context shared by a page of questions.
#[derive(Debug, Default)]
pub struct AnswerSetIndex {
    /// Question ids per answer set.
    pub questions: HashMap<DbId, Vec<DbId>>,
    pub options: HashMap<DbId, Vec<OptionView>>,
}

impl AnswerSetIndex {
    pub fn new(question_sets: &[(DbId, DbId)], options: Vec<AnswerOptionRow>) -> Self {
        let mut index = Self::default();
        for (question_id, set_id) in question_sets {
            index.questions.entry(*set_id).or_default().push(*question_id);
        }
        for option in options {
            index
                .options
                .entry(option.answer_set_id)
                .or_default()
                .push(OptionView {
                    id: option.id,
                    text: option.text,
                });
        }
        index
    }
}

impl QuestionView {
    pub fn new(question: QuestionRow, index: &AnswerSetIndex) -> Self {
        let (occurrence, options) = match question.answer_set_id {
            Some(set_id) => (
                index
                    .questions
                    .get(&set_id)
                    .and_then(|ids| answer_set_occurrence(question.id, ids)),
                Some(index.options.get(&set_id).cloned().unwrap_or_default()),
            ),
            None => (None, None),
        };
        Self {
            id: question.id,
            group_identifier: question.group_identifier,
            language: question.language_code,
            name: question.name,
            text: question.text,
            description: question.description,
            question_type: question.question_type,
            required: question.required,
            answer_set_id: question.answer_set_id,
            answer_set_occurrence: occurrence,
            answer_set_options: options,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnswerSetView {
    pub id: DbId,
    pub name: String,
    pub language: String,
    pub options: Vec<OptionView>,
}

#[derive(Debug, Serialize)]
pub struct ResponseView {
    pub id: DbId,
    pub candidate: DbId,
    pub question: QuestionView,
    pub text_answer: Option<String>,
    pub selected_option: Option<DbId>,
    pub selected_options: Vec<DbId>,
    pub created_at: DateTime<Utc>,
}

impl ResponseView {
    pub fn new(response: CandidateResponseRow, question: QuestionView, selected: Vec<DbId>) -> Self {
        Self {
            id: response.id,
            candidate: response.candidate_id,
            question,
            text_answer: response.text_answer,
            selected_option: response.selected_option_id,
            selected_options: selected,
            created_at: response.created_at,
        }
    }
}

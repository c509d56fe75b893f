//! Survey persistence. Questions are always read joined with their
//! language code.

use std::collections::HashMap;

use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use super::validation::{resolve_group_identifier, ResponseInput};
use super::views::{AnswerSetIndex, AnswerSetView, OptionView, QuestionView, ResponseView};
use crate::errors::AppError;
use crate::models::career::LanguageRow;
use crate::models::survey::{
    AnswerOptionRow, AnswerSetRow, CandidateResponseRow, QuestionRow, QuestionType,
};
use crate::models::DbId;

const QUESTION_SELECT: &str = r#"
    SELECT q.id, q.group_identifier, q.language_id, l.code AS language_code, q.name, q.text,
           q.description, q.question_type, q.required, q.answer_set_id
    FROM questions q
    JOIN languages l ON l.id = q.language_id
"#;

pub async fn list_languages(db: &PgPool) -> Result<Vec<LanguageRow>, AppError> {
    Ok(
        sqlx::query_as::<_, LanguageRow>("SELECT * FROM languages ORDER BY code")
            .fetch_all(db)
            .await?,
    )
}

async fn language_id(db: &PgPool, code: &str) -> Result<DbId, AppError> {
    let row: Option<(DbId,)> = sqlx::query_as("SELECT id FROM languages WHERE code = $1")
        .bind(code)
        .fetch_optional(db)
        .await?;
    row.map(|(id,)| id)
        .ok_or_else(|| AppError::Validation(format!("Unknown language '{code}'")))
}

pub async fn list_answer_sets(
    db: &PgPool,
    language: Option<&str>,
) -> Result<Vec<AnswerSetView>, AppError> {
    let sets: Vec<(DbId, String, String)> = sqlx::query_as(
        r#"
        SELECT s.id, s.name, l.code
        FROM answer_sets s
        JOIN languages l ON l.id = s.language_id
        WHERE $1::TEXT IS NULL OR l.code = $1
        ORDER BY s.id
        "#,
    )
    .bind(language)
    .fetch_all(db)
    .await?;

    let ids: Vec<DbId> = sets.iter().map(|(id, _, _)| *id).collect();
    let options = options_for_sets(db, &ids).await?;
    let mut by_set: HashMap<DbId, Vec<OptionView>> = HashMap::new();
    for option in options {
        by_set.entry(option.answer_set_id).or_default().push(OptionView {
            id: option.id,
            text: option.text,
        });
    }

    Ok(sets
        .into_iter()
        .map(|(id, name, language)| AnswerSetView {
            id,
            name,
            language,
            options: by_set.remove(&id).unwrap_or_default(),
        })
        .collect())
}

pub async fn create_answer_set(
    db: &PgPool,
    language_code: &str,
    name: &str,
) -> Result<AnswerSetRow, AppError> {
    let language_id = language_id(db, language_code).await?;
    Ok(sqlx::query_as::<_, AnswerSetRow>(
        "INSERT INTO answer_sets (language_id, name) VALUES ($1, $2) RETURNING *",
    )
    .bind(language_id)
    .bind(name)
    .fetch_one(db)
    .await?)
}

pub async fn add_answer_option(
    db: &PgPool,
    answer_set_id: DbId,
    text: &str,
) -> Result<AnswerOptionRow, AppError> {
    let exists: Option<(DbId,)> = sqlx::query_as("SELECT id FROM answer_sets WHERE id = $1")
        .bind(answer_set_id)
        .fetch_optional(db)
        .await?;
    if exists.is_none() {
        return Err(AppError::NotFound(format!(
            "Answer set {answer_set_id} not found"
        )));
    }
    Ok(sqlx::query_as::<_, AnswerOptionRow>(
        "INSERT INTO answer_options (answer_set_id, text) VALUES ($1, $2) RETURNING *",
    )
    .bind(answer_set_id)
    .bind(text)
    .fetch_one(db)
    .await?)
}

pub async fn options_for_sets(
    db: &PgPool,
    answer_set_ids: &[DbId],
) -> Result<Vec<AnswerOptionRow>, AppError> {
    Ok(sqlx::query_as::<_, AnswerOptionRow>(
        "SELECT * FROM answer_options WHERE answer_set_id = ANY($1) ORDER BY id",
    )
    .bind(answer_set_ids)
    .fetch_all(db)
    .await?)
}

pub async fn get_question(db: &PgPool, id: DbId) -> Result<Option<QuestionRow>, AppError> {
    Ok(
        sqlx::query_as::<_, QuestionRow>(&format!("{QUESTION_SELECT} WHERE q.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?,
    )
}

pub async fn list_questions(
    db: &PgPool,
    language: Option<&str>,
) -> Result<Vec<QuestionRow>, AppError> {
    Ok(sqlx::query_as::<_, QuestionRow>(&format!(
        "{QUESTION_SELECT} WHERE $1::TEXT IS NULL OR l.code = $1 ORDER BY q.id"
    ))
    .bind(language)
    .fetch_all(db)
    .await?)
}

/// Loads the answer-set context and renders question views.
pub async fn question_views(
    db: &PgPool,
    questions: Vec<QuestionRow>,
) -> Result<Vec<QuestionView>, AppError> {
    let mut set_ids: Vec<DbId> = questions.iter().filter_map(|q| q.answer_set_id).collect();
    set_ids.sort_unstable();
    set_ids.dedup();

    let siblings: Vec<(DbId, DbId)> = sqlx::query_as(
        "SELECT id, answer_set_id FROM questions WHERE answer_set_id = ANY($1) ORDER BY id",
    )
    .bind(&set_ids)
    .fetch_all(db)
    .await?;
    let options = options_for_sets(db, &set_ids).await?;

    let index = AnswerSetIndex::new(&siblings, options);
    Ok(questions
        .into_iter()
        .map(|q| QuestionView::new(q, &index))
        .collect())
}

pub async fn list_group_identifiers(db: &PgPool) -> Result<Vec<String>, AppError> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT DISTINCT group_identifier FROM questions ORDER BY group_identifier")
            .fetch_all(db)
            .await?;
    Ok(rows.into_iter().map(|(g,)| g).collect())
}

#[derive(Debug, Deserialize)]
pub struct QuestionInput {
    pub group_identifier: Option<String>,
    /// An identifier already used by another question, to link translations.
    pub existing_identifier: Option<String>,
    pub language: String,
    pub name: String,
    pub text: String,
    pub description: Option<String>,
    pub question_type: QuestionType,
    #[serde(default = "default_required")]
    pub required: bool,
    pub answer_set_id: Option<DbId>,
}

fn default_required() -> bool {
    true
}

/// Creates (`id = None`) or updates a question.
pub async fn save_question(
    db: &PgPool,
    id: Option<DbId>,
    input: &QuestionInput,
) -> Result<QuestionRow, AppError> {
    let group = resolve_group_identifier(
        input.group_identifier.as_deref(),
        input.existing_identifier.as_deref(),
        &input.name,
    );
    let language_id = language_id(db, &input.language).await?;

    let duplicate: Option<(DbId,)> = sqlx::query_as(
        r#"
        SELECT id FROM questions
        WHERE group_identifier = $1 AND language_id = $2
          AND ($3::BIGINT IS NULL OR id <> $3)
        LIMIT 1
        "#,
    )
    .bind(&group)
    .bind(language_id)
    .bind(id)
    .fetch_optional(db)
    .await?;
    if duplicate.is_some() {
        return Err(AppError::Validation(
            "A question with this Group Identifier and Language already exists.".into(),
        ));
    }

    if let Some(set_id) = input.answer_set_id {
        let set = sqlx::query_as::<_, AnswerSetRow>("SELECT * FROM answer_sets WHERE id = $1")
            .bind(set_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::Validation(format!("Answer set {set_id} does not exist")))?;
        if set.language_id != language_id {
            return Err(AppError::Validation(
                "The selected Answer Set must have the same language as the Question.".into(),
            ));
        }
    }

    let question_id: Option<(DbId,)> = match id {
        None => sqlx::query_as(
            r#"
            INSERT INTO questions
                (group_identifier, language_id, name, text, description, question_type,
                 required, answer_set_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&group)
        .bind(language_id)
        .bind(&input.name)
        .bind(&input.text)
        .bind(&input.description)
        .bind(input.question_type.as_str())
        .bind(input.required)
        .bind(input.answer_set_id)
        .fetch_optional(db)
        .await?,
        Some(id) => sqlx::query_as(
            r#"
            UPDATE questions SET
                group_identifier = $2, language_id = $3, name = $4, text = $5,
                description = $6, question_type = $7, required = $8, answer_set_id = $9
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(&group)
        .bind(language_id)
        .bind(&input.name)
        .bind(&input.text)
        .bind(&input.description)
        .bind(input.question_type.as_str())
        .bind(input.required)
        .bind(input.answer_set_id)
        .fetch_optional(db)
        .await?,
    };

    let (question_id,) = question_id
        .ok_or_else(|| AppError::NotFound(format!("Question {} not found", id.unwrap_or_default())))?;
    info!(question_id, group_identifier = %group, "Question saved");
    get_question(db, question_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Question {question_id} not found")))
}

/// Persists a validated response with its selected options.
pub async fn insert_response(
    db: &PgPool,
    candidate_id: DbId,
    question_id: DbId,
    input: &ResponseInput,
) -> Result<(CandidateResponseRow, Vec<DbId>), AppError> {
    let mut tx = db.begin().await?;

    let text = input
        .text_answer
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let response = sqlx::query_as::<_, CandidateResponseRow>(
        r#"
        INSERT INTO candidate_responses (candidate_id, question_id, text_answer, selected_option_id)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(candidate_id)
    .bind(question_id)
    .bind(text)
    .bind(input.selected_option)
    .fetch_one(&mut *tx)
    .await?;

    for option_id in &input.selected_options {
        sqlx::query(
            r#"
            INSERT INTO candidate_response_options (response_id, answer_option_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(response.id)
        .bind(option_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    let mut selected = input.selected_options.clone();
    selected.sort_unstable();
    selected.dedup();
    Ok((response, selected))
}

pub async fn list_responses(
    db: &PgPool,
    candidate_id: DbId,
) -> Result<Vec<ResponseView>, AppError> {
    let responses = sqlx::query_as::<_, CandidateResponseRow>(
        "SELECT * FROM candidate_responses WHERE candidate_id = $1 ORDER BY created_at, id",
    )
    .bind(candidate_id)
    .fetch_all(db)
    .await?;
    if responses.is_empty() {
        return Ok(Vec::new());
    }

    let response_ids: Vec<DbId> = responses.iter().map(|r| r.id).collect();
    let links: Vec<(DbId, DbId)> = sqlx::query_as(
        r#"
        SELECT response_id, answer_option_id FROM candidate_response_options
        WHERE response_id = ANY($1)
        ORDER BY answer_option_id
        "#,
    )
    .bind(&response_ids)
    .fetch_all(db)
    .await?;
    let mut selected: HashMap<DbId, Vec<DbId>> = HashMap::new();
    for (response_id, option_id) in links {
        selected.entry(response_id).or_default().push(option_id);
    }

    let mut question_ids: Vec<DbId> = responses.iter().map(|r| r.question_id).collect();
    question_ids.sort_unstable();
    question_ids.dedup();
    let questions = sqlx::query_as::<_, QuestionRow>(&format!(
        "{QUESTION_SELECT} WHERE q.id = ANY($1)"
    ))
    .bind(&question_ids)
    .fetch_all(db)
    .await?;
    let questions: HashMap<DbId, QuestionView> = question_views(db, questions)
        .await?
        .into_iter()
        .map(|q| (q.id, q))
        .collect();

    Ok(responses
        .into_iter()
        .filter_map(|r| {
            let question = questions.get(&r.question_id)?.clone();
            let options = selected.remove(&r.id).unwrap_or_default();
            Some(ResponseView::new(r, question, options))
        })
        .collect())
}

//! Careers and their localized titles.

use std::collections::HashMap;

use serde::Serialize;
use sqlx::PgPool;

use crate::errors::{is_unique_violation, AppError};
use crate::models::career::{CandidateCareerRow, CareerRow, CareerTranslationRow};
use crate::models::DbId;

pub mod handlers;

const TRANSLATION_COLUMNS: &str = "ct.id, ct.career_id, ct.language_id, l.code AS language_code, \
     ct.title, ct.transition_path";

#[derive(Debug, Serialize)]
pub struct TranslationView {
    pub language: String,
    pub title: String,
    pub transition_path: String,
}

#[derive(Debug, Serialize)]
pub struct CareerView {
    pub id: DbId,
    pub group_identifier: String,
    pub translations: Vec<TranslationView>,
}

impl CareerView {
    pub fn new(career: CareerRow, translations: Vec<CareerTranslationRow>) -> Self {
        Self {
            id: career.id,
            group_identifier: career.group_identifier,
            translations: translations
                .into_iter()
                .filter(|t| t.career_id == career.id)
                .map(|t| TranslationView {
                    language: t.language_code,
                    title: t.title,
                    transition_path: t.transition_path,
                })
                .collect(),
        }
    }
}

/// Pairs each career with its translations, keeping career order.
fn assemble(careers: Vec<CareerRow>, translations: Vec<CareerTranslationRow>) -> Vec<CareerView> {
    let mut by_career: HashMap<DbId, Vec<CareerTranslationRow>> = HashMap::new();
    for t in translations {
        by_career.entry(t.career_id).or_default().push(t);
    }
    careers
        .into_iter()
        .map(|c| {
            let translations = by_career.remove(&c.id).unwrap_or_default();
            CareerView::new(c, translations)
        })
        .collect()
}

async fn translations_for(
    db: &PgPool,
    career_ids: &[DbId],
) -> Result<Vec<CareerTranslationRow>, AppError> {
    Ok(sqlx::query_as::<_, CareerTranslationRow>(&format!(
        "SELECT {TRANSLATION_COLUMNS} FROM career_translations ct \
         JOIN languages l ON l.id = ct.language_id \
         WHERE ct.career_id = ANY($1) ORDER BY ct.career_id, l.code"
    ))
    .bind(career_ids)
    .fetch_all(db)
    .await?)
}

pub async fn list_careers(db: &PgPool) -> Result<Vec<CareerView>, AppError> {
    let careers = sqlx::query_as::<_, CareerRow>("SELECT * FROM careers ORDER BY id")
        .fetch_all(db)
        .await?;
    let ids: Vec<DbId> = careers.iter().map(|c| c.id).collect();
    let translations = translations_for(db, &ids).await?;
    Ok(assemble(careers, translations))
}

/// Careers recommended to a candidate, most recent first.
/// The candidate's `limit` most recent recommendations.
pub async fn recommended_careers(
    db: &PgPool,
    candidate_id: DbId,
    limit: i32,
) -> Result<Vec<CareerView>, AppError> {
    let careers = sqlx::query_as::<_, CareerRow>(
        r#"
        SELECT c.id, c.group_identifier
        FROM careers c
        JOIN candidate_careers cc ON cc.career_id = c.id
        WHERE cc.candidate_id = $1
        ORDER BY cc.created_at DESC, c.id
        LIMIT $2
        "#,
    )
    .bind(candidate_id)
    .bind(i64::from(limit.max(0)))
    .fetch_all(db)
    .await?;
    let ids: Vec<DbId> = careers.iter().map(|c| c.id).collect();
    let translations = translations_for(db, &ids).await?;
    Ok(assemble(careers, translations))
}

pub async fn create_career(db: &PgPool, group_identifier: &str) -> Result<CareerRow, AppError> {
    sqlx::query_as::<_, CareerRow>(
        "INSERT INTO careers (group_identifier) VALUES ($1) RETURNING *",
    )
    .bind(group_identifier)
    .fetch_one(db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!("Career '{group_identifier}' already exists"))
        } else {
            AppError::Database(e)
        }
    })
}

pub async fn add_translation(
    db: &PgPool,
    career_id: DbId,
    language_code: &str,
    title: &str,
    transition_path: &str,
) -> Result<CareerTranslationRow, AppError> {
    let language: Option<(DbId,)> = sqlx::query_as("SELECT id FROM languages WHERE code = $1")
        .bind(language_code)
        .fetch_optional(db)
        .await?;
    let (language_id,) = language
        .ok_or_else(|| AppError::Validation(format!("Unknown language '{language_code}'")))?;

    sqlx::query_as::<_, CareerTranslationRow>(
        r#"
        WITH inserted AS (
            INSERT INTO career_translations (career_id, language_id, title, transition_path)
            VALUES ($1, $2, $3, $4)
            RETURNING *
        )
        SELECT i.id, i.career_id, i.language_id, $5::TEXT AS language_code,
               i.title, i.transition_path
        FROM inserted i
        "#,
    )
    .bind(career_id)
    .bind(language_id)
    .bind(title)
    .bind(transition_path)
    .bind(language_code)
    .fetch_one(db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!(
                "Career {career_id} already has a '{language_code}' translation"
            ))
        } else {
            AppError::Database(e)
        }
    })
}

pub async fn recommend_career(
    db: &PgPool,
    candidate_id: DbId,
    career_id: DbId,
) -> Result<CandidateCareerRow, AppError> {
    Ok(sqlx::query_as::<_, CandidateCareerRow>(
        "INSERT INTO candidate_careers (candidate_id, career_id) VALUES ($1, $2) RETURNING *",
    )
    .bind(candidate_id)
    .bind(career_id)
    .fetch_one(db)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translation(id: DbId, career_id: DbId, code: &str, title: &str) -> CareerTranslationRow {
        CareerTranslationRow {
            id,
            career_id,
            language_id: id,
            language_code: code.to_string(),
            title: title.to_string(),
            transition_path: String::new(),
        }
    }

    #[test]
    fn test_view_lists_translations_by_language_code() {
        let view = CareerView::new(
            CareerRow {
                id: 1,
                group_identifier: "data".to_string(),
            },
            vec![translation(1, 1, "en", "Data Scientist")],
        );
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["translations"][0]["language"], "en");
        assert_eq!(json["translations"][0]["title"], "Data Scientist");
    }

    #[test]
    fn test_assemble_keeps_career_order_and_grouping() {
        let careers = vec![
            CareerRow {
                id: 2,
                group_identifier: "b".to_string(),
            },
            CareerRow {
                id: 1,
                group_identifier: "a".to_string(),
            },
        ];
        let views = assemble(
            careers,
            vec![
                translation(1, 1, "en", "A"),
                translation(2, 2, "en", "B"),
                translation(3, 1, "fr", "A fr"),
            ],
        );
        assert_eq!(views[0].id, 2);
        assert_eq!(views[0].translations.len(), 1);
        assert_eq!(views[1].translations.len(), 2);
    }
}

//! A candidate's recent job searches, offered back as suggestions.

use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::job::SearchTermRow;
use crate::models::DbId;

const MAX_TERM_CHARS: usize = 255;

/// Trims and collapses whitespace. `None` for a blank search.
pub fn normalize_search_term(raw: &str) -> Option<String> {
    let term = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if term.is_empty() {
        return None;
    }
    Some(term.chars().take(MAX_TERM_CHARS).collect())
}

/// Records a search. Repeating a term refreshes it and reactivates it.
pub async fn record_search_term(
    db: &PgPool,
    candidate_id: DbId,
    term: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO search_terms (candidate_id, term)
        VALUES ($1, $2)
        ON CONFLICT (candidate_id, term)
        DO UPDATE SET is_active = TRUE, last_searched_at = NOW()
        "#,
    )
    .bind(candidate_id)
    .bind(term)
    .execute(db)
    .await?;
    Ok(())
}

/// The `limit` most recent active terms.
pub async fn recent_search_terms(
    db: &PgPool,
    candidate_id: DbId,
    limit: i32,
) -> Result<Vec<SearchTermRow>, AppError> {
    Ok(sqlx::query_as::<_, SearchTermRow>(
        r#"
        SELECT id, term, last_searched_at FROM search_terms
        WHERE candidate_id = $1 AND is_active = TRUE
        ORDER BY last_searched_at DESC, id DESC
        LIMIT $2
        "#,
    )
    .bind(candidate_id)
    .bind(i64::from(limit.max(0)))
    .fetch_all(db)
    .await?)
}

/// Hides a term from suggestions. `false` when the candidate has no such term.
pub async fn dismiss_search_term(
    db: &PgPool,
    candidate_id: DbId,
    id: DbId,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE search_terms SET is_active = FALSE WHERE id = $1 AND candidate_id = $2",
    )
    .bind(id)
    .bind(candidate_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}

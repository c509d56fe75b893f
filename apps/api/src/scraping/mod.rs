//! Scraping targets. Every keyword is paired with every location; the
//! pairing rows are written by the store when either side is created.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::StaffUser;
use crate::errors::AppError;
use crate::models::scraping::{CombinationRow, KeywordRow, LocationRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateKeywordRequest {
    pub keyword: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateLocationRequest {
    pub location: String,
}

#[derive(Debug, Serialize)]
pub struct Created<T> {
    #[serde(flatten)]
    pub row: T,
    pub combinations_created: u64,
}

fn required(value: &str, field: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

/// POST /api/v1/admin/keywords
pub async fn handle_create_keyword(
    State(state): State<AppState>,
    _staff: StaffUser,
    Json(req): Json<CreateKeywordRequest>,
) -> Result<(StatusCode, Json<Created<KeywordRow>>), AppError> {
    let keyword = required(&req.keyword, "keyword")?;
    let (row, combinations_created) = state.store.create_keyword(&keyword).await?;
    info!(keyword = %row.keyword, combinations_created, "Keyword created");
    Ok((
        StatusCode::CREATED,
        Json(Created {
            row,
            combinations_created,
        }),
    ))
}

/// POST /api/v1/admin/locations
pub async fn handle_create_location(
    State(state): State<AppState>,
    _staff: StaffUser,
    Json(req): Json<CreateLocationRequest>,
) -> Result<(StatusCode, Json<Created<LocationRow>>), AppError> {
    let location = required(&req.location, "location")?;
    let (row, combinations_created) = state.store.create_location(&location).await?;
    info!(location = %row.location, combinations_created, "Location created");
    Ok((
        StatusCode::CREATED,
        Json(Created {
            row,
            combinations_created,
        }),
    ))
}

/// GET /api/v1/admin/keywords
pub async fn handle_list_keywords(
    State(state): State<AppState>,
    _staff: StaffUser,
) -> Result<Json<Vec<KeywordRow>>, AppError> {
    Ok(Json(state.store.list_keywords().await?))
}

/// GET /api/v1/admin/locations
pub async fn handle_list_locations(
    State(state): State<AppState>,
    _staff: StaffUser,
) -> Result<Json<Vec<LocationRow>>, AppError> {
    Ok(Json(state.store.list_locations().await?))
}

/// GET /api/v1/admin/combinations
pub async fn handle_list_combinations(
    State(state): State<AppState>,
    _staff: StaffUser,
) -> Result<Json<Vec<CombinationRow>>, AppError> {
    Ok(Json(state.store.list_combinations().await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::Store;

    #[test]
    fn test_blank_keyword_is_rejected() {
        assert!(matches!(
            required("   ", "keyword"),
            Err(AppError::Validation(_))
        ));
        assert_eq!(required(" rust ", "keyword").unwrap(), "rust");
    }

    #[tokio::test]
    async fn test_cross_product_is_maintained_from_both_sides() {
        let store = MemoryStore::new();
        store.create_location("Paris").await.unwrap();
        store.create_location("Lyon").await.unwrap();

        let (_, created) = store.create_keyword("rust").await.unwrap();
        assert_eq!(created, 2);

        let (_, created) = store.create_location("Nantes").await.unwrap();
        assert_eq!(created, 1);

        let (_, created) = store.create_keyword("go").await.unwrap();
        assert_eq!(created, 3);

        assert_eq!(store.list_combinations().await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_duplicate_keyword_is_a_conflict() {
        let store = MemoryStore::new();
        store.create_keyword("rust").await.unwrap();
        assert!(matches!(
            store.create_keyword("rust").await,
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_created_response_flattens_row() {
        let json = serde_json::to_value(Created {
            row: KeywordRow {
                id: 1,
                keyword: "rust".to_string(),
                is_scraped: false,
            },
            combinations_created: 4,
        })
        .unwrap();
        assert_eq!(json["keyword"], "rust");
        assert_eq!(json["combinations_created"], 4);
    }
}

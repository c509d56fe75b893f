use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::DbId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct KeywordRow {
    pub id: DbId,
    pub keyword: String,
    pub is_scraped: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LocationRow {
    pub id: DbId,
    pub location: String,
    pub is_scraped: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CombinationRow {
    pub id: DbId,
    pub keyword_id: DbId,
    pub location_id: DbId,
    pub is_scraped: bool,
}

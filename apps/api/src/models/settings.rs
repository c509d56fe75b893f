use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::DbId;

/// The single row of site-wide settings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GeneralSettingsRow {
    pub ads_per_page: i32,
    pub max_recent_search_terms: i32,
    pub credits_to_start_with: i32,
    pub num_of_careers_to_generate: i32,
    pub last_updated: DateTime<Utc>,
}

impl Default for GeneralSettingsRow {
    fn default() -> Self {
        Self {
            ads_per_page: 2,
            max_recent_search_terms: 10,
            credits_to_start_with: 10,
            num_of_careers_to_generate: 5,
            last_updated: Utc::now(),
        }
    }
}

/// Partial update. `None` leaves a setting untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralSettingsUpdate {
    pub ads_per_page: Option<i32>,
    pub max_recent_search_terms: Option<i32>,
    pub credits_to_start_with: Option<i32>,
    pub num_of_careers_to_generate: Option<i32>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ScrapingSettingRow {
    pub id: DbId,
    pub num_jobs_to_scrape: i32,
    pub is_scraping: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapingSettingInput {
    #[serde(default = "default_jobs_to_scrape")]
    pub num_jobs_to_scrape: i32,
    #[serde(default)]
    pub is_scraping: bool,
}

fn default_jobs_to_scrape() -> i32 {
    100
}

//! Site-wide settings and the single scraping configuration.

use serde::Serialize;
use sqlx::PgPool;

use crate::errors::{is_unique_violation, AppError};
use crate::models::settings::{
    GeneralSettingsRow, GeneralSettingsUpdate, ScrapingSettingInput, ScrapingSettingRow,
};
use crate::models::DbId;

pub mod handlers;

const SINGLE_SCRAPING_SETTING: &str =
    "There can be only one instance of settings, you can not add another";

/// What the frontend needs to lay out pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicSettings {
    pub ads_per_page: i32,
    pub max_recent_search_terms: i32,
    pub num_of_careers_to_generate: i32,
}

impl From<&GeneralSettingsRow> for PublicSettings {
    fn from(row: &GeneralSettingsRow) -> Self {
        Self {
            ads_per_page: row.ads_per_page,
            max_recent_search_terms: row.max_recent_search_terms,
            num_of_careers_to_generate: row.num_of_careers_to_generate,
        }
    }
}

/// Every setting is a count and must not be negative.
pub fn validate_general_settings(update: &GeneralSettingsUpdate) -> Result<(), AppError> {
    let fields = [
        ("ads_per_page", update.ads_per_page),
        ("max_recent_search_terms", update.max_recent_search_terms),
        ("credits_to_start_with", update.credits_to_start_with),
        ("num_of_careers_to_generate", update.num_of_careers_to_generate),
    ];
    for (name, value) in fields {
        if value.is_some_and(|v| v < 0) {
            return Err(AppError::Validation(format!("{name} must not be negative")));
        }
    }
    Ok(())
}

/// A scraping setting may only be created while none exists.
pub fn ensure_no_scraping_setting(existing: Option<DbId>) -> Result<(), AppError> {
    match existing {
        Some(_) => Err(AppError::Validation(SINGLE_SCRAPING_SETTING.into())),
        None => Ok(()),
    }
}

pub async fn get_scraping_setting(db: &PgPool) -> Result<Option<ScrapingSettingRow>, AppError> {
    Ok(sqlx::query_as::<_, ScrapingSettingRow>(
        "SELECT id, num_jobs_to_scrape, is_scraping FROM scraping_settings ORDER BY id LIMIT 1",
    )
    .fetch_optional(db)
    .await?)
}

pub async fn create_scraping_setting(
    db: &PgPool,
    input: &ScrapingSettingInput,
) -> Result<ScrapingSettingRow, AppError> {
    ensure_no_scraping_setting(get_scraping_setting(db).await?.map(|s| s.id))?;

    sqlx::query_as::<_, ScrapingSettingRow>(
        r#"
        INSERT INTO scraping_settings (num_jobs_to_scrape, is_scraping)
        VALUES ($1, $2)
        RETURNING id, num_jobs_to_scrape, is_scraping
        "#,
    )
    .bind(input.num_jobs_to_scrape)
    .bind(input.is_scraping)
    .fetch_one(db)
    .await
    .map_err(|e| {
        // Lost a race with a concurrent create.
        if is_unique_violation(&e) {
            AppError::Validation(SINGLE_SCRAPING_SETTING.into())
        } else {
            AppError::Database(e)
        }
    })
}

pub async fn update_scraping_setting(
    db: &PgPool,
    id: DbId,
    input: &ScrapingSettingInput,
) -> Result<ScrapingSettingRow, AppError> {
    sqlx::query_as::<_, ScrapingSettingRow>(
        r#"
        UPDATE scraping_settings SET num_jobs_to_scrape = $2, is_scraping = $3
        WHERE id = $1
        RETURNING id, num_jobs_to_scrape, is_scraping
        "#,
    )
    .bind(id)
    .bind(input.num_jobs_to_scrape)
    .bind(input.is_scraping)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Scraping setting {id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_scraping_setting_is_rejected() {
        match ensure_no_scraping_setting(Some(1)) {
            Err(AppError::Validation(msg)) => assert_eq!(msg, SINGLE_SCRAPING_SETTING),
            other => panic!("expected a validation error, got {other:?}"),
        }
        assert!(ensure_no_scraping_setting(None).is_ok());
    }

    #[test]
    fn test_negative_counts_are_rejected() {
        let update = GeneralSettingsUpdate {
            ads_per_page: Some(3),
            max_recent_search_terms: Some(-1),
            ..Default::default()
        };
        assert!(matches!(
            validate_general_settings(&update),
            Err(AppError::Validation(msg)) if msg.contains("max_recent_search_terms")
        ));
        assert!(validate_general_settings(&GeneralSettingsUpdate::default()).is_ok());
    }

    #[test]
    fn test_public_settings_hide_starting_credits() {
        let row = GeneralSettingsRow::default();
        let json = serde_json::to_value(PublicSettings::from(&row)).unwrap();
        assert_eq!(json["ads_per_page"], 2);
        assert_eq!(json["max_recent_search_terms"], 10);
        assert_eq!(json["num_of_careers_to_generate"], 5);
        assert!(json.get("credits_to_start_with").is_none());
    }
}

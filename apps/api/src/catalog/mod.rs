//! Credit packs and advertising slots.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::errors::{is_unique_violation, AppError};
use crate::models::catalog::{AdRow, AdType, PackRow, PriceRow};
use crate::models::DbId;

pub mod handlers;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceView {
    pub credits: i32,
    pub price_cents: i64,
}

#[derive(Debug, Serialize)]
pub struct PackView {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub prices: Vec<PriceView>,
}

fn pack_views(packs: Vec<PackRow>, prices: Vec<PriceRow>) -> Vec<PackView> {
    let mut by_pack: HashMap<DbId, Vec<PriceView>> = HashMap::new();
    for price in prices {
        by_pack.entry(price.pack_id).or_default().push(PriceView {
            credits: price.credits,
            price_cents: price.price_cents,
        });
    }
    packs
        .into_iter()
        .map(|pack| PackView {
            prices: by_pack.remove(&pack.id).unwrap_or_default(),
            id: pack.id,
            name: pack.name,
            description: pack.description,
            is_active: pack.is_active,
        })
        .collect()
}

pub async fn list_active_packs(db: &PgPool) -> Result<Vec<PackView>, AppError> {
    let packs = sqlx::query_as::<_, PackRow>(
        "SELECT * FROM packs WHERE is_active = TRUE ORDER BY id",
    )
    .fetch_all(db)
    .await?;
    let ids: Vec<DbId> = packs.iter().map(|p| p.id).collect();
    let prices = sqlx::query_as::<_, PriceRow>(
        "SELECT * FROM prices WHERE pack_id = ANY($1) ORDER BY credits",
    )
    .bind(&ids)
    .fetch_all(db)
    .await?;
    Ok(pack_views(packs, prices))
}

pub async fn create_pack(
    db: &PgPool,
    name: &str,
    description: Option<&str>,
    is_active: bool,
) -> Result<PackRow, AppError> {
    sqlx::query_as::<_, PackRow>(
        "INSERT INTO packs (name, description, is_active) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(name)
    .bind(description)
    .bind(is_active)
    .fetch_one(db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!("Pack '{name}' already exists"))
        } else {
            AppError::Database(e)
        }
    })
}

pub async fn add_price(
    db: &PgPool,
    pack_id: DbId,
    credits: i32,
    price_cents: i64,
) -> Result<PriceRow, AppError> {
    if credits < 0 {
        return Err(AppError::Validation("credits must not be negative".into()));
    }
    if price_cents < 0 {
        return Err(AppError::Validation("price must not be negative".into()));
    }
    sqlx::query_as::<_, PriceRow>(
        "INSERT INTO prices (pack_id, credits, price_cents) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(pack_id)
    .bind(credits)
    .bind(price_cents)
    .fetch_one(db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!("Pack {pack_id} already has a {credits}-credit price"))
        } else {
            AppError::Database(e)
        }
    })
}

pub async fn list_active_ads(
    db: &PgPool,
    ad_type: Option<AdType>,
) -> Result<Vec<AdRow>, AppError> {
    Ok(sqlx::query_as::<_, AdRow>(
        r#"
        SELECT * FROM ads
        WHERE is_active = TRUE AND ($1::TEXT IS NULL OR ad_type = $1)
        ORDER BY created_at DESC
        "#,
    )
    .bind(ad_type.map(|t| t.as_str()))
    .fetch_all(db)
    .await?)
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdInput {
    pub title: String,
    pub description: String,
    pub original_url: String,
    pub background: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default = "default_ad_type")]
    pub ad_type: AdType,
}

fn default_active() -> bool {
    true
}

fn default_ad_type() -> AdType {
    AdType::InJobs
}

/// Top and loading slots hold one active ad each.
pub fn check_ad_slot(input: &AdInput, slot_taken: bool) -> Result<(), AppError> {
    if input.ad_type.is_exclusive() && input.is_active && slot_taken {
        return Err(AppError::Validation(format!(
            "Only one active ad can have the type '{}'.",
            input.ad_type.as_str()
        )));
    }
    Ok(())
}

async fn slot_taken(db: &PgPool, ad_type: AdType, exclude: Option<DbId>) -> Result<bool, AppError> {
    let row: Option<(DbId,)> = sqlx::query_as(
        r#"
        SELECT id FROM ads
        WHERE ad_type = $1 AND is_active = TRUE AND ($2::BIGINT IS NULL OR id <> $2)
        LIMIT 1
        "#,
    )
    .bind(ad_type.as_str())
    .bind(exclude)
    .fetch_optional(db)
    .await?;
    Ok(row.is_some())
}

/// Creates (`id = None`) or updates an ad.
pub async fn save_ad(db: &PgPool, id: Option<DbId>, input: &AdInput) -> Result<AdRow, AppError> {
    if input.title.trim().is_empty() || input.original_url.trim().is_empty() {
        return Err(AppError::Validation("title and original_url are required".into()));
    }
    check_ad_slot(input, slot_taken(db, input.ad_type, id).await?)?;

    let row = match id {
        None => sqlx::query_as::<_, AdRow>(
            r#"
            INSERT INTO ads (title, description, original_url, background, is_active, ad_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.original_url)
        .bind(&input.background)
        .bind(input.is_active)
        .bind(input.ad_type.as_str())
        .fetch_optional(db)
        .await?,
        Some(id) => sqlx::query_as::<_, AdRow>(
            r#"
            UPDATE ads SET
                title = $2, description = $3, original_url = $4, background = $5,
                is_active = $6, ad_type = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.original_url)
        .bind(&input.background)
        .bind(input.is_active)
        .bind(input.ad_type.as_str())
        .fetch_optional(db)
        .await?,
    };
    row.ok_or_else(|| AppError::NotFound(format!("Ad {} not found", id.unwrap_or_default())))
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::DbId;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CreditActionRow {
    pub id: DbId,
    pub action_name: String,
    pub credit_cost: f64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CreditOrderRow {
    pub id: DbId,
    pub candidate_id: DbId,
    pub credits: i32,
    pub price_cents: i64,
    pub order_id: String,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Paypal,
    Stripe,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::Stripe => "stripe",
        }
    }
}

/// A completed purchase joined with the payment that settled it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CreditPurchaseRow {
    pub id: DbId,
    pub candidate_id: DbId,
    pub order_id: String,
    pub credits_purchased: i32,
    pub amount_cents: i64,
    pub currency: String,
    pub payment_method: String,
    pub transaction_id: String,
    pub timestamp: DateTime<Utc>,
}

//! Credit balance: per-action costs, spending, and the order/purchase ledger.
//!
//! An order pins a pack price. Completing it records the payment and the
//! purchase and credits the candidate in one transaction. Taking the payment
//! itself happens outside this service.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::{is_unique_violation, AppError};
use crate::models::credit::{CreditActionRow, CreditOrderRow, CreditPurchaseRow, PaymentMethod};
use crate::models::DbId;

pub mod handlers;

const DEFAULT_CURRENCY: &str = "USD";

/// Balance left after paying `cost`, or a validation error when it does not cover it.
pub fn remaining_balance(balance: f64, cost: f64) -> Result<f64, AppError> {
    if cost > balance {
        return Err(AppError::Validation(format!(
            "Insufficient credits: {cost} required, {balance} available"
        )));
    }
    Ok(balance - cost)
}

/// Orders are settled once.
pub fn ensure_payable(order: &CreditOrderRow) -> Result<(), AppError> {
    if order.paid {
        return Err(AppError::Conflict(format!(
            "Order {} is already paid",
            order.order_id
        )));
    }
    Ok(())
}

pub fn new_order_id() -> String {
    format!("order_{}", Uuid::new_v4().simple())
}

pub async fn list_credit_actions(db: &PgPool) -> Result<Vec<CreditActionRow>, AppError> {
    Ok(
        sqlx::query_as::<_, CreditActionRow>("SELECT * FROM credit_actions ORDER BY action_name")
            .fetch_all(db)
            .await?,
    )
}

/// Creates the action or replaces its cost.
pub async fn save_credit_action(
    db: &PgPool,
    action_name: &str,
    credit_cost: f64,
) -> Result<CreditActionRow, AppError> {
    let action_name = action_name.trim();
    if action_name.is_empty() {
        return Err(AppError::Validation("action_name is required".into()));
    }
    if !credit_cost.is_finite() || credit_cost < 0.0 {
        return Err(AppError::Validation("credit_cost must not be negative".into()));
    }
    Ok(sqlx::query_as::<_, CreditActionRow>(
        r#"
        INSERT INTO credit_actions (action_name, credit_cost)
        VALUES ($1, $2)
        ON CONFLICT (action_name) DO UPDATE SET credit_cost = EXCLUDED.credit_cost
        RETURNING *
        "#,
    )
    .bind(action_name)
    .bind(credit_cost)
    .fetch_one(db)
    .await?)
}

#[derive(Debug, Serialize)]
pub struct SpendReceipt {
    pub action_name: String,
    pub credit_cost: f64,
    pub credits: f64,
}

/// Charges the candidate the cost of `action_name`.
pub async fn spend_credits(
    db: &PgPool,
    candidate_id: DbId,
    action_name: &str,
) -> Result<SpendReceipt, AppError> {
    let mut tx = db.begin().await?;

    let action = sqlx::query_as::<_, CreditActionRow>(
        "SELECT * FROM credit_actions WHERE action_name = $1",
    )
    .bind(action_name)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Credit action '{action_name}' not found")))?;

    let (balance,): (f64,) =
        sqlx::query_as("SELECT credits FROM candidates WHERE id = $1 FOR UPDATE")
            .bind(candidate_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;
    let credits = remaining_balance(balance, action.credit_cost)?;

    sqlx::query("UPDATE candidates SET credits = $2, updated_at = NOW() WHERE id = $1")
        .bind(candidate_id)
        .bind(credits)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!(
        candidate_id,
        action = %action.action_name,
        cost = action.credit_cost,
        credits,
        "Credits spent"
    );
    Ok(SpendReceipt {
        action_name: action.action_name,
        credit_cost: action.credit_cost,
        credits,
    })
}

/// Opens an order for one of an active pack's prices.
pub async fn create_order(
    db: &PgPool,
    candidate_id: DbId,
    pack_id: DbId,
    credits: i32,
) -> Result<CreditOrderRow, AppError> {
    let price: Option<(i64,)> = sqlx::query_as(
        r#"
        SELECT p.price_cents FROM prices p
        JOIN packs ON packs.id = p.pack_id
        WHERE p.pack_id = $1 AND p.credits = $2 AND packs.is_active = TRUE
        "#,
    )
    .bind(pack_id)
    .bind(credits)
    .fetch_optional(db)
    .await?;
    let Some((price_cents,)) = price else {
        return Err(AppError::Validation(format!(
            "Pack {pack_id} has no active {credits}-credit price"
        )));
    };

    let order = sqlx::query_as::<_, CreditOrderRow>(
        r#"
        INSERT INTO credit_orders (candidate_id, credits, price_cents, order_id)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(candidate_id)
    .bind(credits)
    .bind(price_cents)
    .bind(new_order_id())
    .fetch_one(db)
    .await?;
    info!(candidate_id, order_id = %order.order_id, credits, price_cents, "Credit order created");
    Ok(order)
}

pub async fn list_orders(db: &PgPool, candidate_id: DbId) -> Result<Vec<CreditOrderRow>, AppError> {
    Ok(sqlx::query_as::<_, CreditOrderRow>(
        "SELECT * FROM credit_orders WHERE candidate_id = $1 ORDER BY created_at DESC",
    )
    .bind(candidate_id)
    .fetch_all(db)
    .await?)
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentInput {
    pub transaction_id: String,
    #[serde(default = "default_payment_method")]
    pub payment_method: PaymentMethod,
    pub currency: Option<String>,
}

fn default_payment_method() -> PaymentMethod {
    PaymentMethod::Stripe
}

const PURCHASE_SELECT: &str = r#"
    SELECT cp.id, cp.candidate_id, o.order_id, cp.credits_purchased,
           p.amount_cents, p.currency, p.payment_method, p.transaction_id, cp.timestamp
    FROM credit_purchases cp
    JOIN payments p ON p.id = cp.payment_id
    JOIN credit_orders o ON o.id = cp.order_id
"#;

/// Settles an order: records the completed payment and the purchase, marks
/// the order paid and credits the candidate.
pub async fn complete_order(
    db: &PgPool,
    order_id: &str,
    payment: &PaymentInput,
) -> Result<CreditPurchaseRow, AppError> {
    if payment.transaction_id.trim().is_empty() {
        return Err(AppError::Validation("transaction_id is required".into()));
    }
    let mut tx = db.begin().await?;

    let order = sqlx::query_as::<_, CreditOrderRow>(
        "SELECT * FROM credit_orders WHERE order_id = $1 FOR UPDATE",
    )
    .bind(order_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Order {order_id} not found")))?;
    ensure_payable(&order)?;

    let (payment_id,): (DbId,) = sqlx::query_as(
        r#"
        INSERT INTO payments
            (candidate_id, amount_cents, currency, payment_method, transaction_id, status)
        VALUES ($1, $2, $3, $4, $5, 'completed')
        RETURNING id
        "#,
    )
    .bind(order.candidate_id)
    .bind(order.price_cents)
    .bind(payment.currency.as_deref().unwrap_or(DEFAULT_CURRENCY))
    .bind(payment.payment_method.as_str())
    .bind(payment.transaction_id.trim())
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!(
                "Transaction {} was already recorded",
                payment.transaction_id.trim()
            ))
        } else {
            AppError::Database(e)
        }
    })?;

    let (purchase_id,): (DbId,) = sqlx::query_as(
        r#"
        INSERT INTO credit_purchases (candidate_id, payment_id, order_id, credits_purchased)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(order.candidate_id)
    .bind(payment_id)
    .bind(order.id)
    .bind(order.credits)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE credit_orders SET paid = TRUE WHERE id = $1")
        .bind(order.id)
        .execute(&mut *tx)
        .await?;
    sqlx::query(
        "UPDATE candidates SET credits = credits + $2, updated_at = NOW() WHERE id = $1",
    )
    .bind(order.candidate_id)
    .bind(f64::from(order.credits))
    .execute(&mut *tx)
    .await?;

    let purchase = sqlx::query_as::<_, CreditPurchaseRow>(&format!(
        "{PURCHASE_SELECT} WHERE cp.id = $1"
    ))
    .bind(purchase_id)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    info!(
        candidate_id = order.candidate_id,
        order_id = %order.order_id,
        credits = order.credits,
        "Credit order completed"
    );
    Ok(purchase)
}

/// Purchases, newest first. `None` lists every candidate's.
pub async fn list_purchases(
    db: &PgPool,
    candidate_id: Option<DbId>,
) -> Result<Vec<CreditPurchaseRow>, AppError> {
    Ok(sqlx::query_as::<_, CreditPurchaseRow>(&format!(
        "{PURCHASE_SELECT}
        WHERE $1::BIGINT IS NULL OR cp.candidate_id = $1
        ORDER BY cp.timestamp DESC"
    ))
    .bind(candidate_id)
    .fetch_all(db)
    .await?)
}

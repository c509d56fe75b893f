use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::{
    complete_order, create_order, list_credit_actions, list_orders, list_purchases,
    save_credit_action, spend_credits, PaymentInput, SpendReceipt,
};
use crate::accounts::current_candidate;
use crate::auth::{AuthUser, StaffUser};
use crate::errors::AppError;
use crate::models::credit::{CreditActionRow, CreditOrderRow, CreditPurchaseRow};
use crate::models::DbId;
use crate::state::AppState;

/// GET /api/v1/credit-actions
pub async fn handle_list_credit_actions(
    State(state): State<AppState>,
) -> Result<Json<Vec<CreditActionRow>>, AppError> {
    Ok(Json(list_credit_actions(&state.db).await?))
}

#[derive(Debug, Deserialize)]
pub struct SpendRequest {
    pub action_name: String,
}

/// POST /api/v1/credits/spend
pub async fn handle_spend_credits(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<SpendRequest>,
) -> Result<Json<SpendReceipt>, AppError> {
    let candidate = current_candidate(state.store.as_ref(), &user).await?;
    Ok(Json(
        spend_credits(&state.db, candidate.id, req.action_name.trim()).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub pack_id: DbId,
    pub credits: i32,
}

/// POST /api/v1/credits/orders
pub async fn handle_create_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreditOrderRow>), AppError> {
    let candidate = current_candidate(state.store.as_ref(), &user).await?;
    let order = create_order(&state.db, candidate.id, req.pack_id, req.credits).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/v1/credits/orders
pub async fn handle_list_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<CreditOrderRow>>, AppError> {
    let candidate = current_candidate(state.store.as_ref(), &user).await?;
    Ok(Json(list_orders(&state.db, candidate.id).await?))
}

/// GET /api/v1/credits/purchases
pub async fn handle_list_purchases(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<CreditPurchaseRow>>, AppError> {
    let candidate = current_candidate(state.store.as_ref(), &user).await?;
    Ok(Json(list_purchases(&state.db, Some(candidate.id)).await?))
}

#[derive(Debug, Deserialize)]
pub struct SaveCreditActionRequest {
    pub action_name: String,
    pub credit_cost: f64,
}

/// POST /api/v1/admin/credit-actions
pub async fn handle_save_credit_action(
    State(state): State<AppState>,
    _staff: StaffUser,
    Json(req): Json<SaveCreditActionRequest>,
) -> Result<Json<CreditActionRow>, AppError> {
    Ok(Json(
        save_credit_action(&state.db, &req.action_name, req.credit_cost).await?,
    ))
}

/// POST /api/v1/admin/credits/orders/:order_id/complete
pub async fn handle_complete_order(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(order_id): Path<String>,
    Json(payment): Json<PaymentInput>,
) -> Result<(StatusCode, Json<CreditPurchaseRow>), AppError> {
    let purchase = complete_order(&state.db, &order_id, &payment).await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

/// GET /api/v1/admin/credits/purchases
pub async fn handle_list_all_purchases(
    State(state): State<AppState>,
    _staff: StaffUser,
) -> Result<Json<Vec<CreditPurchaseRow>>, AppError> {
    Ok(Json(list_purchases(&state.db, None).await?))
}

//! Order API Handlers
//!
//! Thin layer over the settlement engine: validate the payload, build the
//! caller context, delegate. Read endpoints check that the caller is a
//! party to the order (or an admin) before returning anything.

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use shared::error::{AppError, AppResult};
use shared::models::{Order, OrderCancel, OrderComplete, OrderCreate, Payment, PaymentInitiate};

use crate::auth::CurrentUser;
use crate::core::ServerState;

fn require_party(order: &Order, user: &CurrentUser) -> Result<(), AppError> {
    if user.is_admin() || order.buyer_id == user.id || order.seller_id == user.id {
        Ok(())
    } else {
        Err(AppError::forbidden("not a party to this order"))
    }
}

/// POST /api/orders - open an order against a listing
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let order = state.engine.create_order(&user.caller(), payload).await?;
    Ok(Json(order))
}

/// GET /api/orders - the caller's purchases
pub async fn list_purchases(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.storage.list_orders_for_buyer(&user.id)?;
    Ok(Json(orders))
}

/// GET /api/orders/sales - the caller's sales
pub async fn list_sales(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.storage.list_orders_for_seller(&user.id)?;
    Ok(Json(orders))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state
        .storage
        .get_order(&id)?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;
    require_party(&order, &user)?;
    Ok(Json(order))
}

/// GET /api/orders/:id/payments - payment history for an order
pub async fn list_payments(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Payment>>> {
    let order = state
        .storage
        .get_order(&id)?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;
    require_party(&order, &user)?;

    let payments = state.storage.payments_for_order(&id)?;
    Ok(Json(payments))
}

/// POST /api/orders/:id/payments - start a payment attempt
pub async fn initiate_payment(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<PaymentInitiate>,
) -> AppResult<Json<Payment>> {
    let payment = state
        .engine
        .initiate_payment(&user.caller(), &id, payload)
        .await?;
    Ok(Json(payment))
}

/// POST /api/orders/:id/complete - admin verification gate
pub async fn complete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<OrderComplete>,
) -> AppResult<Json<Order>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let (order, _earning) = state
        .engine
        .complete_order(&user.caller(), &id, payload)
        .await?;
    Ok(Json(order))
}

/// POST /api/orders/:id/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<OrderCancel>,
) -> AppResult<Json<Order>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let order = state
        .engine
        .cancel_order(&user.caller(), &id, payload)
        .await?;
    Ok(Json(order))
}

//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use shared::error::{AppError, AppResult};
use shared::models::{Product, ProductCreate};

use crate::auth::CurrentUser;
use crate::core::ServerState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Only purchasable listings (default true)
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// GET /api/products - browse the catalog
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let products = state.storage.list_products(query.available)?;
    Ok(Json(products))
}

/// GET /api/products/mine - the caller's own listings
pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Product>>> {
    let products = state.storage.list_products_for_seller(&user.id)?;
    Ok(Json(products))
}

/// GET /api/products/:id - look up one listing
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let product = state
        .storage
        .get_product(&id)?
        .ok_or_else(|| AppError::not_found(format!("Product {}", id)))?;
    Ok(Json(product))
}

/// POST /api/products - create a listing (sellers only)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let product = state.engine.create_product(&user.caller(), payload).await?;
    Ok(Json(product))
}

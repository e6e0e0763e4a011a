//! Product Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Product listing status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    #[default]
    Available,
    Sold,
    Delisted,
}

impl ProductStatus {
    /// Whether an order may be created against this listing
    pub fn is_purchasable(&self) -> bool {
        matches!(self, ProductStatus::Available)
    }
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    /// Seller reference (immutable after creation)
    pub seller_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Listing price in currency units (2 decimal places)
    pub price: f64,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
}

//! Platform Earning Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Commission recorded when an order completes
///
/// Written in the same transaction that moves the order to `Completed`,
/// so earnings and completed orders never drift apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEarning {
    pub id: String,
    /// Completed order this earning settles (one earning per order)
    pub order_id: String,
    /// Platform fee on the sale price
    pub transaction_fee: f64,
    /// Fee for a promoted listing, zero unless the product was promoted
    pub premium_listing_fee: f64,
    /// Platform share of the shipping charge
    pub shipping_commission: f64,
    /// Sum of all fee components, rounded to 2 decimal places
    pub total_earnings: f64,
    pub created_at: DateTime<Utc>,
}

/// Aggregate earnings report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarningsSummary {
    pub order_count: u64,
    pub transaction_fees: f64,
    pub premium_listing_fees: f64,
    pub shipping_commissions: f64,
    pub total_earnings: f64,
}

//! Earnings API Handlers

use axum::{Json, extract::State};
use rust_decimal::Decimal;

use shared::error::{AppError, AppResult};
use shared::models::EarningsSummary;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::settlement::fees::{to_decimal, to_f64};

/// GET /api/earnings/summary - aggregate platform earnings (admin)
pub async fn summary(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<EarningsSummary>> {
    if !user.is_admin() {
        return Err(AppError::forbidden("admin role required"));
    }

    let earnings = state.storage.list_earnings()?;

    let mut transaction_fees = Decimal::ZERO;
    let mut premium_listing_fees = Decimal::ZERO;
    let mut shipping_commissions = Decimal::ZERO;
    let mut total = Decimal::ZERO;
    for earning in &earnings {
        transaction_fees += to_decimal(earning.transaction_fee);
        premium_listing_fees += to_decimal(earning.premium_listing_fee);
        shipping_commissions += to_decimal(earning.shipping_commission);
        total += to_decimal(earning.total_earnings);
    }

    Ok(Json(EarningsSummary {
        order_count: earnings.len() as u64,
        transaction_fees: to_f64(transaction_fees),
        premium_listing_fees: to_f64(premium_listing_fees),
        shipping_commissions: to_f64(shipping_commissions),
        total_earnings: to_f64(total),
    }))
}

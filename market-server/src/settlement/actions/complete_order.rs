//! CompleteOrder command handler
//!
//! Admin verification gate: checks the order out of the verification queue,
//! marks the product sold, and records the platform earning. All three
//! writes share one transaction; an earning can therefore never exist
//! without its completed order.

use async_trait::async_trait;

use shared::models::{Order, OrderComplete, OrderStatus, PlatformEarning, ProductStatus};

use crate::settlement::fees::{to_decimal, to_f64};
use crate::settlement::traits::{
    CallerContext, CommandContext, CommandHandler, SettlementError,
};

pub struct CompleteOrderAction {
    pub order_id: String,
    pub payload: OrderComplete,
}

#[async_trait]
impl CommandHandler for CompleteOrderAction {
    type Output = (Order, PlatformEarning);

    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        caller: &CallerContext,
    ) -> Result<(Order, PlatformEarning), SettlementError> {
        caller.require_admin()?;

        let mut order = ctx.load_order(&self.order_id)?;
        if order.status != OrderStatus::AdminVerification {
            return Err(SettlementError::OrderNotVerifiable(order.id.clone()));
        }

        let now = ctx.now();

        order.status = OrderStatus::Completed;
        order.verified_at = Some(now);
        order.verified_by = Some(caller.user_id.clone());
        order.completed_at = Some(now);
        if let Some(tracking) = &self.payload.tracking_number {
            order.tracking_number = Some(tracking.clone());
        }
        if let Some(notes) = &self.payload.notes {
            order.notes = Some(notes.clone());
        }
        ctx.store_order(&order)?;

        // The listing leaves the catalog only now, not at payment time
        let mut product = ctx.load_product(&order.product_id)?;
        product.status = ProductStatus::Sold;
        ctx.store_product(&product)?;

        // Transaction fee comes from the split snapshotted at creation;
        // the other components are zero until those features carry charges.
        let transaction_fee = order.fee_amount;
        let premium_listing_fee = 0.0;
        let shipping_commission = 0.0;
        let total = to_f64(
            to_decimal(transaction_fee)
                + to_decimal(premium_listing_fee)
                + to_decimal(shipping_commission),
        );

        let earning = PlatformEarning {
            id: uuid::Uuid::new_v4().to_string(),
            order_id: order.id.clone(),
            transaction_fee,
            premium_listing_fee,
            shipping_commission,
            total_earnings: total,
            created_at: now,
        };
        ctx.storage().put_earning(ctx.txn(), &order.id, &earning)?;

        Ok((order, earning))
    }
}

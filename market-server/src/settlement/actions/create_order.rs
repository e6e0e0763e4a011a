//! CreateOrder command handler
//!
//! Opens an order against an available listing. Seller id and gross amount
//! are snapshotted from the product here and never change afterwards, even
//! if the listing is edited later.

use async_trait::async_trait;
use uuid::Uuid;

use shared::models::{Order, OrderCreate, OrderStatus};

use crate::settlement::fees::{compute_fees, validate_amount};
use crate::settlement::traits::{
    CallerContext, CommandContext, CommandHandler, SettlementError,
};

pub struct CreateOrderAction {
    pub payload: OrderCreate,
    pub fee_rate: f64,
}

#[async_trait]
impl CommandHandler for CreateOrderAction {
    type Output = Order;

    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        caller: &CallerContext,
    ) -> Result<Order, SettlementError> {
        // 1. Buyer must exist
        let buyer = ctx.load_user(&caller.user_id)?;

        // 2. Product must exist and be purchasable
        let product = ctx.load_product(&self.payload.product_id)?;
        if !product.status.is_purchasable() {
            return Err(SettlementError::ProductNotAvailable(product.id.clone()));
        }
        if product.seller_id == buyer.id {
            return Err(SettlementError::SelfPurchase);
        }

        // 3. Validate payload fields the type system cannot
        if self.payload.shipping_address.trim().is_empty() {
            return Err(SettlementError::Validation(
                "shipping address must not be empty".to_string(),
            ));
        }
        validate_amount(self.payload.shipping_cost, "shipping cost")?;

        // 4. Fee split, snapshotted at creation time
        let fees = compute_fees(product.price, self.fee_rate)?;

        let order = Order {
            id: Uuid::new_v4().to_string(),
            order_number: ctx.next_order_number()?,
            buyer_id: buyer.id,
            seller_id: product.seller_id.clone(),
            product_id: product.id.clone(),
            gross_amount: fees.gross_amount,
            fee_amount: fees.fee_amount,
            net_amount: fees.net_amount,
            status: OrderStatus::PendingPayment,
            shipping_address: self.payload.shipping_address.clone(),
            shipping_method: self.payload.shipping_method.clone(),
            shipping_cost: self.payload.shipping_cost,
            tracking_number: None,
            shipped_at: None,
            delivered_at: None,
            created_at: ctx.now(),
            paid_at: None,
            verified_at: None,
            verified_by: None,
            completed_at: None,
            cancelled_at: None,
            cancelled_by: None,
            cancel_reason: None,
            notes: None,
        };

        ctx.store_order(&order)?;

        Ok(order)
    }
}

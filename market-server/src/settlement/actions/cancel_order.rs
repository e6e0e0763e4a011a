//! CancelOrder command handler
//!
//! Buyer, seller and admin may all cancel any non-terminal order. If money
//! has already been taken (a completed payment exists) the order lands in
//! `Refunded` and the payment is marked accordingly; unresolved payment
//! attempts are closed as `Cancelled` so the confirmation worker will not
//! advance the order later.

use async_trait::async_trait;

use shared::models::{Order, OrderCancel, OrderStatus, PaymentStatus};

use crate::settlement::traits::{
    CallerContext, CommandContext, CommandHandler, SettlementError,
};

pub struct CancelOrderAction {
    pub order_id: String,
    pub payload: OrderCancel,
}

#[async_trait]
impl CommandHandler for CancelOrderAction {
    type Output = Order;

    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        caller: &CallerContext,
    ) -> Result<Order, SettlementError> {
        let mut order = ctx.load_order(&self.order_id)?;

        if order.status.is_terminal() {
            return Err(SettlementError::OrderNotCancellable(order.id.clone()));
        }

        let is_party = caller.user_id == order.buyer_id || caller.user_id == order.seller_id;
        if !caller.role.is_admin() && !is_party {
            return Err(SettlementError::Forbidden(
                "not a party to this order".to_string(),
            ));
        }

        if self.payload.reason.trim().is_empty() {
            return Err(SettlementError::Validation(
                "a cancellation reason is required".to_string(),
            ));
        }

        let now = ctx.now();
        let mut money_taken = false;

        for mut payment in ctx.storage().payments_for_order_txn(ctx.txn(), &order.id)? {
            match payment.status {
                PaymentStatus::Completed => {
                    money_taken = true;
                    payment.status = PaymentStatus::Refunded;
                    payment.processed_at = Some(now);
                    ctx.store_payment(&payment)?;
                }
                PaymentStatus::Pending | PaymentStatus::Processing => {
                    payment.status = PaymentStatus::Cancelled;
                    payment.processed_at = Some(now);
                    ctx.store_payment(&payment)?;
                }
                _ => {}
            }
        }

        order.status = if money_taken {
            OrderStatus::Refunded
        } else {
            OrderStatus::Cancelled
        };
        order.cancelled_at = Some(now);
        order.cancelled_by = Some(caller.user_id.clone());
        order.cancel_reason = Some(self.payload.reason.clone());
        ctx.store_order(&order)?;

        Ok(order)
    }
}

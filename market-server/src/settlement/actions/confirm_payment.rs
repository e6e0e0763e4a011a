//! ConfirmPayment command handler
//!
//! Applies a gateway outcome to a payment attempt. Runs from the
//! confirmation worker, never from an HTTP handler. The handler re-reads
//! the order's current status at apply time: if the order was cancelled
//! while the gateway was in flight, the payment outcome is recorded but
//! the order is left untouched.

use async_trait::async_trait;

use shared::models::{Order, OrderStatus, PaymentStatus};

use crate::settlement::gateway::GatewayOutcome;
use crate::settlement::traits::{
    CallerContext, CommandContext, CommandHandler, SettlementError,
};

pub struct ConfirmPaymentAction {
    pub payment_id: String,
    pub outcome: GatewayOutcome,
}

/// What the confirmation did to the order, for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmResult {
    /// Payment completed and the order moved to admin verification
    OrderAdvanced,
    /// Payment failed; the order stays payable
    PaymentFailed,
    /// Payment resolved but the order had already left `PendingPayment`
    OrderUntouched,
}

#[async_trait]
impl CommandHandler for ConfirmPaymentAction {
    type Output = (Order, ConfirmResult);

    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        _caller: &CallerContext,
    ) -> Result<(Order, ConfirmResult), SettlementError> {
        let mut payment = ctx.load_payment(&self.payment_id)?;

        // Exactly-once resolution
        if payment.status.is_resolved() {
            return Err(SettlementError::PaymentAlreadyResolved(payment.id.clone()));
        }

        let mut order = ctx.load_order(&payment.order_id)?;
        payment.processed_at = Some(ctx.now());

        let result = match &self.outcome {
            GatewayOutcome::Success { reference } => {
                payment.status = PaymentStatus::Completed;
                payment.provider_reference = Some(reference.clone());
                ctx.store_payment(&payment)?;

                if order.status == OrderStatus::PendingPayment {
                    // Paid is transited through immediately: a successful
                    // confirmation always lands in the verification queue.
                    order.status = OrderStatus::AdminVerification;
                    order.paid_at = Some(ctx.now());
                    ctx.store_order(&order)?;
                    ConfirmResult::OrderAdvanced
                } else {
                    // Cancelled (or otherwise moved on) while in flight.
                    // Never resurrect the order.
                    ConfirmResult::OrderUntouched
                }
            }
            GatewayOutcome::Failure { reason } => {
                payment.status = PaymentStatus::Failed;
                payment.failure_reason = Some(reason.clone());
                ctx.store_payment(&payment)?;
                ConfirmResult::PaymentFailed
            }
        };

        Ok((order, result))
    }
}

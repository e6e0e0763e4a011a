//! InitiatePayment command handler
//!
//! Opens a payment attempt for an order awaiting payment. The attempt is
//! stored as `Processing` before the gateway is ever contacted, so a crash
//! between commit and confirmation is visible to the recovery scan.

use async_trait::async_trait;
use uuid::Uuid;

use shared::models::{OrderStatus, Payment, PaymentInitiate, PaymentStatus};

use crate::settlement::traits::{
    CallerContext, CommandContext, CommandHandler, SettlementError,
};

pub struct InitiatePaymentAction {
    pub order_id: String,
    pub payload: PaymentInitiate,
}

#[async_trait]
impl CommandHandler for InitiatePaymentAction {
    type Output = Payment;

    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        caller: &CallerContext,
    ) -> Result<Payment, SettlementError> {
        let order = ctx.load_order(&self.order_id)?;

        // Only the buyer pays for their order
        if order.buyer_id != caller.user_id {
            return Err(SettlementError::Forbidden(
                "only the buyer may pay for this order".to_string(),
            ));
        }

        if order.status != OrderStatus::PendingPayment {
            return Err(SettlementError::OrderNotPayable(order.id.clone()));
        }

        // At most one unresolved attempt per order
        let attempts = ctx.storage().payments_for_order_txn(ctx.txn(), &order.id)?;
        if attempts.iter().any(|p| !p.status.is_resolved()) {
            return Err(SettlementError::PaymentInFlight(order.id.clone()));
        }

        // The charge is the gross amount snapshotted at order creation;
        // shipping is settled on the order itself, never at the gateway.
        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            order_id: order.id.clone(),
            amount: order.gross_amount,
            method: self.payload.method,
            status: PaymentStatus::Processing,
            provider_reference: None,
            failure_reason: None,
            created_at: ctx.now(),
            processed_at: None,
        };

        ctx.store_payment(&payment)?;
        ctx.storage()
            .link_payment(ctx.txn(), &order.id, &payment.id)?;

        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{PaymentMethod, UserRole};

    use crate::settlement::actions::fixtures;
    use crate::settlement::storage::MarketStorage;

    fn action(order_id: &str) -> InitiatePaymentAction {
        InitiatePaymentAction {
            order_id: order_id.to_string(),
            payload: PaymentInitiate {
                method: PaymentMethod::Card,
            },
        }
    }

    #[tokio::test]
    async fn test_initiate_payment_success() {
        let storage = MarketStorage::open_in_memory().unwrap();
        let buyer = fixtures::user("buyer-1", "alice", UserRole::Buyer);
        let mut order = fixtures::order("order-1", "buyer-1", "seller-1", "prod-1", 100.0);
        order.shipping_cost = 5.50;
        fixtures::seed(&storage, &[buyer.clone()], &[], &[order]);

        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage);

        let payment = action("order-1")
            .execute(&mut ctx, &fixtures::caller(&buyer))
            .await
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::Processing);
        // Shipping never inflates the gateway charge
        assert_eq!(payment.amount, 100.0);
        assert!(payment.amount <= 100.0);
        assert_eq!(payment.method, PaymentMethod::Card);
        assert_eq!(
            ctx.storage()
                .payments_for_order_txn(ctx.txn(), "order-1")
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_initiate_payment_second_attempt_conflicts() {
        let storage = MarketStorage::open_in_memory().unwrap();
        let buyer = fixtures::user("buyer-1", "alice", UserRole::Buyer);
        let order = fixtures::order("order-1", "buyer-1", "seller-1", "prod-1", 100.0);
        fixtures::seed(&storage, &[buyer.clone()], &[], &[order]);

        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage);

        action("order-1")
            .execute(&mut ctx, &fixtures::caller(&buyer))
            .await
            .unwrap();

        let err = action("order-1")
            .execute(&mut ctx, &fixtures::caller(&buyer))
            .await
            .unwrap_err();
        assert!(matches!(err, SettlementError::PaymentInFlight(_)));
    }

    #[tokio::test]
    async fn test_initiate_payment_allows_retry_after_failure() {
        let storage = MarketStorage::open_in_memory().unwrap();
        let buyer = fixtures::user("buyer-1", "alice", UserRole::Buyer);
        let order = fixtures::order("order-1", "buyer-1", "seller-1", "prod-1", 100.0);
        fixtures::seed(&storage, &[buyer.clone()], &[], &[order]);

        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage);

        let mut first = action("order-1")
            .execute(&mut ctx, &fixtures::caller(&buyer))
            .await
            .unwrap();
        first.status = PaymentStatus::Failed;
        first.failure_reason = Some("declined".to_string());
        ctx.store_payment(&first).unwrap();

        let second = action("order-1")
            .execute(&mut ctx, &fixtures::caller(&buyer))
            .await
            .unwrap();
        assert_eq!(second.status, PaymentStatus::Processing);
        assert_ne!(second.id, first.id);
    }

    #[tokio::test]
    async fn test_initiate_payment_wrong_caller() {
        let storage = MarketStorage::open_in_memory().unwrap();
        let stranger = fixtures::user("user-2", "mallory", UserRole::Buyer);
        let order = fixtures::order("order-1", "buyer-1", "seller-1", "prod-1", 100.0);
        fixtures::seed(&storage, &[stranger.clone()], &[], &[order]);

        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage);

        let err = action("order-1")
            .execute(&mut ctx, &fixtures::caller(&stranger))
            .await
            .unwrap_err();
        assert!(matches!(err, SettlementError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_initiate_payment_wrong_state() {
        let storage = MarketStorage::open_in_memory().unwrap();
        let buyer = fixtures::user("buyer-1", "alice", UserRole::Buyer);
        let mut order = fixtures::order("order-1", "buyer-1", "seller-1", "prod-1", 100.0);
        order.status = OrderStatus::Cancelled;
        fixtures::seed(&storage, &[buyer.clone()], &[], &[order]);

        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage);

        let err = action("order-1")
            .execute(&mut ctx, &fixtures::caller(&buyer))
            .await
            .unwrap_err();
        assert!(matches!(err, SettlementError::OrderNotPayable(_)));
    }
}

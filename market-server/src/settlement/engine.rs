//! Settlement engine
//!
//! Single entry point for every state-changing marketplace operation. Each
//! method opens one write transaction, runs the matching command handler,
//! and commits on success; on error the transaction is dropped and nothing
//! is applied. Payment initiation additionally hands the new attempt to the
//! confirmation worker over a channel after the commit.

use tokio::sync::mpsc;

use shared::models::{
    Order, OrderCancel, OrderComplete, OrderCreate, Payment, PaymentInitiate, PlatformEarning,
    Product, ProductCreate, ProductStatus, User, UserCreate, UserRole, UserVerificationStatus,
    Verification, VerificationReview, VerificationSubmit,
};

use super::actions::{
    CancelOrderAction, CompleteOrderAction, ConfirmPaymentAction, ConfirmResult,
    CreateOrderAction, InitiatePaymentAction, ReviewVerificationAction, SubmitVerificationAction,
};
use super::fees::{to_decimal, to_f64, validate_amount};
use super::gateway::GatewayOutcome;
use super::storage::{MarketStorage, StorageError};
use super::traits::{CallerContext, CommandContext, CommandHandler, SettlementError};

pub struct SettlementEngine {
    storage: MarketStorage,
    fee_rate: f64,
    confirm_tx: mpsc::Sender<String>,
}

impl SettlementEngine {
    pub fn new(storage: MarketStorage, fee_rate: f64, confirm_tx: mpsc::Sender<String>) -> Self {
        Self {
            storage,
            fee_rate,
            confirm_tx,
        }
    }

    pub fn storage(&self) -> &MarketStorage {
        &self.storage
    }

    pub fn fee_rate(&self) -> f64 {
        self.fee_rate
    }

    /// Run a handler inside one transaction, committing on success
    async fn run<H: CommandHandler + Sync>(
        &self,
        caller: &CallerContext,
        handler: H,
    ) -> Result<H::Output, SettlementError> {
        let txn = self.storage.begin_write()?;
        let mut ctx = CommandContext::new(&txn, &self.storage);
        let output = handler.execute(&mut ctx, caller).await?;
        txn.commit().map_err(StorageError::from)?;
        Ok(output)
    }

    // ========== Users ==========

    pub async fn create_user(&self, payload: UserCreate) -> Result<User, SettlementError> {
        let username = payload.username.trim().to_string();
        if username.is_empty() {
            return Err(SettlementError::Validation(
                "username must not be empty".to_string(),
            ));
        }

        let txn = self.storage.begin_write()?;
        if self.storage.username_exists_txn(&txn, &username)? {
            return Err(SettlementError::UsernameExists(username));
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.clone(),
            email: payload.email.clone(),
            role: UserRole::Buyer,
            verification_status: UserVerificationStatus::None,
            created_at: chrono::Utc::now(),
        };
        self.storage.put_user(&txn, &user.id, &user)?;
        self.storage.put_username(&txn, &username, &user.id)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    // ========== Products ==========

    pub async fn create_product(
        &self,
        caller: &CallerContext,
        payload: ProductCreate,
    ) -> Result<Product, SettlementError> {
        if !caller.role.can_list_products() {
            return Err(SettlementError::Forbidden(
                "only verified sellers can list products".to_string(),
            ));
        }
        if payload.title.trim().is_empty() {
            return Err(SettlementError::Validation(
                "title must not be empty".to_string(),
            ));
        }
        validate_amount(payload.price, "price")?;

        let txn = self.storage.begin_write()?;
        // Seller record must still exist
        if self.storage.get_user_txn(&txn, &caller.user_id)?.is_none() {
            return Err(SettlementError::UserNotFound(caller.user_id.clone()));
        }

        let product = Product {
            id: uuid::Uuid::new_v4().to_string(),
            seller_id: caller.user_id.clone(),
            title: payload.title.trim().to_string(),
            description: payload.description.clone(),
            price: to_f64(to_decimal(payload.price)),
            status: ProductStatus::Available,
            created_at: chrono::Utc::now(),
        };
        self.storage.put_product(&txn, &product.id, &product)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(product_id = %product.id, seller_id = %product.seller_id, "Product listed");
        Ok(product)
    }

    // ========== Orders ==========

    pub async fn create_order(
        &self,
        caller: &CallerContext,
        payload: OrderCreate,
    ) -> Result<Order, SettlementError> {
        let order = self
            .run(
                caller,
                CreateOrderAction {
                    payload,
                    fee_rate: self.fee_rate,
                },
            )
            .await?;
        tracing::info!(
            order_id = %order.id,
            order_number = %order.order_number,
            gross = order.gross_amount,
            fee = order.fee_amount,
            "Order created"
        );
        Ok(order)
    }

    /// Open a payment attempt and queue it for asynchronous confirmation
    pub async fn initiate_payment(
        &self,
        caller: &CallerContext,
        order_id: &str,
        payload: PaymentInitiate,
    ) -> Result<Payment, SettlementError> {
        let payment = self
            .run(
                caller,
                InitiatePaymentAction {
                    order_id: order_id.to_string(),
                    payload,
                },
            )
            .await?;

        // The attempt is durable already; if the queue is closed the startup
        // recovery scan will pick it up on the next boot.
        if let Err(e) = self.confirm_tx.send(payment.id.clone()).await {
            tracing::error!(payment_id = %payment.id, error = %e, "Confirmation queue unavailable");
        }

        tracing::info!(payment_id = %payment.id, order_id = %order_id, "Payment initiated");
        Ok(payment)
    }

    /// Apply a gateway outcome (called by the confirmation worker)
    pub async fn confirm_payment(
        &self,
        payment_id: &str,
        outcome: GatewayOutcome,
    ) -> Result<(Order, ConfirmResult), SettlementError> {
        let result = self
            .run(
                &CallerContext::system(),
                ConfirmPaymentAction {
                    payment_id: payment_id.to_string(),
                    outcome,
                },
            )
            .await?;
        tracing::info!(
            payment_id = %payment_id,
            order_id = %result.0.id,
            result = ?result.1,
            "Payment confirmed"
        );
        Ok(result)
    }

    /// Admin verification gate: complete the order and record the earning
    pub async fn complete_order(
        &self,
        caller: &CallerContext,
        order_id: &str,
        payload: OrderComplete,
    ) -> Result<(Order, PlatformEarning), SettlementError> {
        let (order, earning) = self
            .run(
                caller,
                CompleteOrderAction {
                    order_id: order_id.to_string(),
                    payload,
                },
            )
            .await?;
        tracing::info!(
            order_id = %order.id,
            total_earnings = earning.total_earnings,
            "Order completed"
        );
        Ok((order, earning))
    }

    pub async fn cancel_order(
        &self,
        caller: &CallerContext,
        order_id: &str,
        payload: OrderCancel,
    ) -> Result<Order, SettlementError> {
        let order = self
            .run(
                caller,
                CancelOrderAction {
                    order_id: order_id.to_string(),
                    payload,
                },
            )
            .await?;
        tracing::info!(order_id = %order.id, status = ?order.status, "Order cancelled");
        Ok(order)
    }

    // ========== Verifications ==========

    pub async fn submit_verification(
        &self,
        caller: &CallerContext,
        payload: VerificationSubmit,
    ) -> Result<Verification, SettlementError> {
        let verification = self
            .run(caller, SubmitVerificationAction { payload })
            .await?;
        tracing::info!(
            verification_id = %verification.id,
            code = %verification.code,
            user_id = %verification.user_id,
            "Verification submitted"
        );
        Ok(verification)
    }

    pub async fn review_verification(
        &self,
        caller: &CallerContext,
        verification_id: &str,
        payload: VerificationReview,
    ) -> Result<Verification, SettlementError> {
        let verification = self
            .run(
                caller,
                ReviewVerificationAction {
                    verification_id: verification_id.to_string(),
                    payload,
                },
            )
            .await?;
        tracing::info!(
            verification_id = %verification.id,
            status = ?verification.status,
            "Verification reviewed"
        );
        Ok(verification)
    }
}

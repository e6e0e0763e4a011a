//! Settlement command plumbing
//!
//! Every settlement operation is a [`CommandHandler`] executed against a
//! [`CommandContext`]. The context wraps one redb write transaction, so a
//! handler either commits all of its entity updates or none of them.
//! Handlers validate first and mutate only after every check has passed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redb::WriteTransaction;
use thiserror::Error;

use shared::error::{AppError, ErrorCode};
use shared::models::{Order, Payment, Product, User, UserRole, Verification};

use super::storage::{MarketStorage, StorageError};

/// Settlement operation errors
#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Payment not found: {0}")]
    PaymentNotFound(String),

    #[error("Verification not found: {0}")]
    VerificationNotFound(String),

    #[error("Order {0} cannot accept payment in its current state")]
    OrderNotPayable(String),

    #[error("Order {0} is not awaiting verification")]
    OrderNotVerifiable(String),

    #[error("Order {0} is in a terminal state and cannot be cancelled")]
    OrderNotCancellable(String),

    #[error("Buyers cannot purchase their own listing")]
    SelfPurchase,

    #[error("Product {0} is not available for purchase")]
    ProductNotAvailable(String),

    #[error("Order {0} already has a payment in flight")]
    PaymentInFlight(String),

    #[error("Payment {0} has already been resolved")]
    PaymentAlreadyResolved(String),

    #[error("User {0} already has a pending verification request")]
    PendingVerificationExists(String),

    #[error("Verification {0} has already been reviewed")]
    VerificationAlreadyReviewed(String),

    #[error("A rejection reason is required")]
    RejectionReasonRequired,

    #[error("Username already taken: {0}")]
    UsernameExists(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<SettlementError> for AppError {
    fn from(err: SettlementError) -> Self {
        match &err {
            SettlementError::OrderNotFound(id) => {
                AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", id.clone())
            }
            SettlementError::ProductNotFound(id) => {
                AppError::new(ErrorCode::ProductNotFound).with_detail("product_id", id.clone())
            }
            SettlementError::UserNotFound(id) => {
                AppError::new(ErrorCode::UserNotFound).with_detail("user_id", id.clone())
            }
            SettlementError::PaymentNotFound(id) => {
                AppError::new(ErrorCode::PaymentNotFound).with_detail("payment_id", id.clone())
            }
            SettlementError::VerificationNotFound(id) => {
                AppError::new(ErrorCode::VerificationNotFound)
                    .with_detail("verification_id", id.clone())
            }
            SettlementError::OrderNotPayable(id) => {
                AppError::new(ErrorCode::OrderNotPayable).with_detail("order_id", id.clone())
            }
            SettlementError::OrderNotVerifiable(id) => {
                AppError::new(ErrorCode::OrderNotVerifiable).with_detail("order_id", id.clone())
            }
            SettlementError::OrderNotCancellable(id) => {
                AppError::new(ErrorCode::OrderNotCancellable).with_detail("order_id", id.clone())
            }
            SettlementError::SelfPurchase => AppError::new(ErrorCode::OrderSelfPurchase),
            SettlementError::ProductNotAvailable(id) => {
                AppError::new(ErrorCode::ProductNotAvailable).with_detail("product_id", id.clone())
            }
            SettlementError::PaymentInFlight(id) => {
                AppError::new(ErrorCode::PaymentInFlight).with_detail("order_id", id.clone())
            }
            SettlementError::PaymentAlreadyResolved(id) => {
                AppError::new(ErrorCode::PaymentAlreadyResolved)
                    .with_detail("payment_id", id.clone())
            }
            SettlementError::PendingVerificationExists(id) => {
                AppError::new(ErrorCode::VerificationPendingExists)
                    .with_detail("user_id", id.clone())
            }
            SettlementError::VerificationAlreadyReviewed(id) => {
                AppError::new(ErrorCode::VerificationAlreadyReviewed)
                    .with_detail("verification_id", id.clone())
            }
            SettlementError::RejectionReasonRequired => {
                AppError::new(ErrorCode::VerificationReasonRequired)
            }
            SettlementError::UsernameExists(name) => {
                AppError::new(ErrorCode::UserUsernameExists).with_detail("username", name.clone())
            }
            SettlementError::Validation(msg) => AppError::validation(msg.clone()),
            SettlementError::Forbidden(msg) => AppError::forbidden(msg.clone()),
            SettlementError::Storage(e) => AppError::database(e.to_string()),
        }
    }
}

/// Authenticated caller identity, carried into every command
#[derive(Debug, Clone)]
pub struct CallerContext {
    pub user_id: String,
    pub username: String,
    pub role: UserRole,
}

impl CallerContext {
    pub fn new(user_id: impl Into<String>, username: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            role,
        }
    }

    /// Internal caller for worker-driven commands (confirmation, recovery)
    pub fn system() -> Self {
        Self::new("system", "system", UserRole::Admin)
    }

    /// Capability gate for admin-only commands
    pub fn require_admin(&self) -> Result<(), SettlementError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(SettlementError::Forbidden(
                "admin role required".to_string(),
            ))
        }
    }
}

/// Execution context for a single settlement command
///
/// Borrows the write transaction so the handler cannot outlive it; the
/// engine commits after the handler returns Ok and drops (aborts) the
/// transaction on error.
pub struct CommandContext<'a> {
    txn: &'a WriteTransaction,
    storage: &'a MarketStorage,
    now: DateTime<Utc>,
}

impl<'a> CommandContext<'a> {
    pub fn new(txn: &'a WriteTransaction, storage: &'a MarketStorage) -> Self {
        Self {
            txn,
            storage,
            now: Utc::now(),
        }
    }

    /// Timestamp shared by every write in this command
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn storage(&self) -> &MarketStorage {
        self.storage
    }

    pub fn txn(&self) -> &WriteTransaction {
        self.txn
    }

    // ========== Entity loads (NotFound on miss) ==========

    pub fn load_order(&self, id: &str) -> Result<Order, SettlementError> {
        self.storage
            .get_order_txn(self.txn, id)?
            .ok_or_else(|| SettlementError::OrderNotFound(id.to_string()))
    }

    pub fn load_product(&self, id: &str) -> Result<Product, SettlementError> {
        self.storage
            .get_product_txn(self.txn, id)?
            .ok_or_else(|| SettlementError::ProductNotFound(id.to_string()))
    }

    pub fn load_user(&self, id: &str) -> Result<User, SettlementError> {
        self.storage
            .get_user_txn(self.txn, id)?
            .ok_or_else(|| SettlementError::UserNotFound(id.to_string()))
    }

    pub fn load_payment(&self, id: &str) -> Result<Payment, SettlementError> {
        self.storage
            .get_payment_txn(self.txn, id)?
            .ok_or_else(|| SettlementError::PaymentNotFound(id.to_string()))
    }

    pub fn load_verification(&self, id: &str) -> Result<Verification, SettlementError> {
        self.storage
            .get_verification_txn(self.txn, id)?
            .ok_or_else(|| SettlementError::VerificationNotFound(id.to_string()))
    }

    // ========== Entity stores ==========

    pub fn store_order(&self, order: &Order) -> Result<(), SettlementError> {
        Ok(self.storage.put_order(self.txn, &order.id, order)?)
    }

    pub fn store_product(&self, product: &Product) -> Result<(), SettlementError> {
        Ok(self.storage.put_product(self.txn, &product.id, product)?)
    }

    pub fn store_user(&self, user: &User) -> Result<(), SettlementError> {
        Ok(self.storage.put_user(self.txn, &user.id, user)?)
    }

    pub fn store_payment(&self, payment: &Payment) -> Result<(), SettlementError> {
        Ok(self.storage.put_payment(self.txn, &payment.id, payment)?)
    }

    pub fn store_verification(&self, verification: &Verification) -> Result<(), SettlementError> {
        Ok(self
            .storage
            .put_verification(self.txn, &verification.id, verification)?)
    }

    // ========== Number generation ==========

    /// Next order number, formatted as "ORD-000042"
    pub fn next_order_number(&self) -> Result<String, SettlementError> {
        let n = self.storage.next_order_number(self.txn)?;
        Ok(format!("ORD-{:06}", n))
    }

    /// Next verification code, formatted as "VRF-20260827-0001"
    pub fn next_verification_code(&self) -> Result<String, SettlementError> {
        let date = self.now.format("%Y%m%d").to_string();
        let date_key: u64 = date.parse().unwrap_or(0);
        let seq = self.storage.next_verification_seq(self.txn, date_key)?;
        Ok(format!("VRF-{}-{:04}", date, seq))
    }
}

/// A settlement command
///
/// Implementations validate against current state, then write through the
/// context. They never commit; that is the engine's job.
#[async_trait]
pub trait CommandHandler {
    type Output;

    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        caller: &CallerContext,
    ) -> Result<Self::Output, SettlementError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_admin() {
        let admin = CallerContext::new("u1", "root", UserRole::Admin);
        assert!(admin.require_admin().is_ok());

        let buyer = CallerContext::new("u2", "alice", UserRole::Buyer);
        assert!(matches!(
            buyer.require_admin(),
            Err(SettlementError::Forbidden(_))
        ));
    }

    #[test]
    fn test_number_formats() {
        let storage = MarketStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        let ctx = CommandContext::new(&txn, &storage);

        let order_number = ctx.next_order_number().unwrap();
        assert_eq!(order_number, "ORD-000001");

        let code = ctx.next_verification_code().unwrap();
        assert!(code.starts_with("VRF-"));
        assert!(code.ends_with("-0001"));
        assert_eq!(code.len(), "VRF-20260827-0001".len());
    }
}

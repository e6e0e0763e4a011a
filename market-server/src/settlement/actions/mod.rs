//! Settlement command implementations
//!
//! One file per operation; each implements [`CommandHandler`] and carries
//! its own tests against in-memory storage.

mod cancel_order;
mod complete_order;
mod confirm_payment;
mod create_order;
mod initiate_payment;
mod review_verification;
mod submit_verification;

pub use cancel_order::CancelOrderAction;
pub use complete_order::CompleteOrderAction;
pub use confirm_payment::{ConfirmPaymentAction, ConfirmResult};
pub use create_order::CreateOrderAction;
pub use initiate_payment::InitiatePaymentAction;
pub use review_verification::ReviewVerificationAction;
pub use submit_verification::SubmitVerificationAction;

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::Utc;
    use shared::models::{
        Order, OrderStatus, Product, ProductStatus, User, UserRole, UserVerificationStatus,
    };

    use crate::settlement::storage::MarketStorage;
    use crate::settlement::traits::CallerContext;

    pub fn caller(user: &User) -> CallerContext {
        CallerContext::new(user.id.clone(), user.username.clone(), user.role)
    }

    pub fn user(id: &str, username: &str, role: UserRole) -> User {
        User {
            id: id.to_string(),
            username: username.to_string(),
            email: format!("{}@example.com", username),
            role,
            verification_status: UserVerificationStatus::None,
            created_at: Utc::now(),
        }
    }

    pub fn product(id: &str, seller_id: &str, price: f64) -> Product {
        Product {
            id: id.to_string(),
            seller_id: seller_id.to_string(),
            title: format!("Listing {}", id),
            description: None,
            price,
            status: ProductStatus::Available,
            created_at: Utc::now(),
        }
    }

    pub fn order(id: &str, buyer_id: &str, seller_id: &str, product_id: &str, gross: f64) -> Order {
        Order {
            id: id.to_string(),
            order_number: format!("ORD-{:06}", 1),
            buyer_id: buyer_id.to_string(),
            seller_id: seller_id.to_string(),
            product_id: product_id.to_string(),
            gross_amount: gross,
            fee_amount: gross * 0.05,
            net_amount: gross * 0.95,
            status: OrderStatus::PendingPayment,
            shipping_address: "1 Test Street".to_string(),
            shipping_method: None,
            shipping_cost: 0.0,
            tracking_number: None,
            shipped_at: None,
            delivered_at: None,
            created_at: Utc::now(),
            paid_at: None,
            verified_at: None,
            verified_by: None,
            completed_at: None,
            cancelled_at: None,
            cancelled_by: None,
            cancel_reason: None,
            notes: None,
        }
    }

    /// Seed entities into committed storage
    pub fn seed(storage: &MarketStorage, users: &[User], products: &[Product], orders: &[Order]) {
        let txn = storage.begin_write().unwrap();
        for u in users {
            storage.put_user(&txn, &u.id, u).unwrap();
            storage.put_username(&txn, &u.username, &u.id).unwrap();
        }
        for p in products {
            storage.put_product(&txn, &p.id, p).unwrap();
        }
        for o in orders {
            storage.put_order(&txn, &o.id, o).unwrap();
        }
        txn.commit().unwrap();
    }
}

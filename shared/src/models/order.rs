//! Order Model
//!
//! An order is a buyer's purchase attempt against one product listing.
//! Status transitions are owned by the settlement engine; nothing outside
//! it writes the `status` field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Order status
///
/// Legal transitions:
///
/// ```text
/// PendingPayment → Paid → AdminVerification → Completed
///       │            │            │
///       └────────────┴────────────┴──→ Cancelled | Refunded
/// ```
///
/// `Completed`, `Cancelled` and `Refunded` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    PendingPayment,
    Paid,
    AdminVerification,
    Completed,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    /// Whether this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Completed | OrderStatus::Cancelled | OrderStatus::Refunded
        )
    }

    /// Whether the order may still be cancelled
    pub fn can_be_cancelled(&self) -> bool {
        !self.is_terminal()
    }

    /// Whether `next` is a legal direct transition from this state
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (PendingPayment, Paid) => true,
            (Paid, AdminVerification) => true,
            (AdminVerification, Completed) => true,
            (PendingPayment | Paid | AdminVerification, Cancelled) => true,
            (PendingPayment | Paid | AdminVerification, Refunded) => true,
            _ => false,
        }
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// Human-readable order number ("ORD-000042")
    pub order_number: String,
    /// Buyer reference (immutable after creation)
    pub buyer_id: String,
    /// Seller reference, snapshotted from the product at creation time
    pub seller_id: String,
    /// Product reference (immutable after creation)
    pub product_id: String,
    /// Sale price before platform fee (2 decimal places)
    pub gross_amount: f64,
    /// Platform fee deducted from the gross amount
    pub fee_amount: f64,
    /// Amount due to the seller (gross − fee, exact)
    pub net_amount: f64,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub shipping_method: Option<String>,
    pub shipping_cost: f64,
    pub tracking_number: Option<String>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub verified_at: Option<DateTime<Utc>>,
    /// Admin who verified and completed the order
    pub verified_by: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancelled_by: Option<String>,
    pub cancel_reason: Option<String>,
    pub notes: Option<String>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    pub product_id: String,
    #[validate(length(min = 1, max = 500))]
    pub shipping_address: String,
    pub shipping_method: Option<String>,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub shipping_cost: f64,
}

/// Admin verify-and-complete payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderComplete {
    #[validate(length(max = 100))]
    pub tracking_number: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

/// Cancel order payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCancel {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!OrderStatus::PendingPayment.is_terminal());
        assert!(!OrderStatus::Paid.is_terminal());
        assert!(!OrderStatus::AdminVerification.is_terminal());
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Refunded.is_terminal());
    }

    #[test]
    fn test_cancellable_states() {
        assert!(OrderStatus::PendingPayment.can_be_cancelled());
        assert!(OrderStatus::Paid.can_be_cancelled());
        assert!(OrderStatus::AdminVerification.can_be_cancelled());
        assert!(!OrderStatus::Completed.can_be_cancelled());
        assert!(!OrderStatus::Cancelled.can_be_cancelled());
        assert!(!OrderStatus::Refunded.can_be_cancelled());
    }

    #[test]
    fn test_happy_path_transitions() {
        assert!(OrderStatus::PendingPayment.can_transition_to(OrderStatus::Paid));
        assert!(OrderStatus::Paid.can_transition_to(OrderStatus::AdminVerification));
        assert!(OrderStatus::AdminVerification.can_transition_to(OrderStatus::Completed));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!OrderStatus::PendingPayment.can_transition_to(OrderStatus::Completed));
        assert!(!OrderStatus::PendingPayment.can_transition_to(OrderStatus::AdminVerification));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Paid));
        assert!(!OrderStatus::Refunded.can_transition_to(OrderStatus::PendingPayment));
    }

    #[test]
    fn test_status_serialize() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::PendingPayment).unwrap(),
            "\"PENDING_PAYMENT\""
        );
        assert_eq!(
            serde_json::to_string(&OrderStatus::AdminVerification).unwrap(),
            "\"ADMIN_VERIFICATION\""
        );
    }
}

//! Payment Model
//!
//! One payment row per confirmation attempt. An order has at most one
//! unresolved payment at a time; resolved attempts are kept for audit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Payment method accepted at checkout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Card,
    BankTransfer,
    Wallet,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "CARD",
            PaymentMethod::BankTransfer => "BANK_TRANSFER",
            PaymentMethod::Wallet => "WALLET",
        }
    }
}

/// Payment attempt status
///
/// `Pending` → `Processing` → `Completed` | `Failed`. A payment stuck in
/// `Processing` past the gateway deadline resolves to `Failed` with reason
/// "timeout". `Cancelled` and `Refunded` mirror the owning order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
    Refunded,
}

impl PaymentStatus {
    /// Whether the attempt has reached a final outcome
    pub fn is_resolved(&self) -> bool {
        !matches!(self, PaymentStatus::Pending | PaymentStatus::Processing)
    }
}

/// Payment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    /// Owning order (immutable after creation)
    pub order_id: String,
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    /// Gateway transaction reference, set on resolution
    pub provider_reference: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

/// Initiate payment payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PaymentInitiate {
    pub method: PaymentMethod,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_states() {
        assert!(!PaymentStatus::Pending.is_resolved());
        assert!(!PaymentStatus::Processing.is_resolved());
        assert!(PaymentStatus::Completed.is_resolved());
        assert!(PaymentStatus::Failed.is_resolved());
        assert!(PaymentStatus::Cancelled.is_resolved());
        assert!(PaymentStatus::Refunded.is_resolved());
    }

    #[test]
    fn test_method_serialize() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::BankTransfer).unwrap(),
            "\"BANK_TRANSFER\""
        );
        assert_eq!(PaymentMethod::Wallet.as_str(), "WALLET");
    }
}

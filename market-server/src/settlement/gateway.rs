//! Payment gateway boundary
//!
//! The engine never talks to a real payment provider; it hands a payment to
//! a [`PaymentGateway`] and gets back one of two outcomes. The simulated
//! gateway stands in for the provider during development and tests.

use async_trait::async_trait;
use std::time::Duration;

use shared::models::Payment;

/// Result of a confirmation attempt at the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayOutcome {
    /// Provider accepted the charge
    Success { reference: String },
    /// Provider declined the charge
    Failure { reason: String },
}

/// Boundary to the payment provider
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Confirm a payment with the provider
    ///
    /// This call may take arbitrarily long; the confirmation worker bounds
    /// the wait and treats overruns as failures.
    async fn confirm(&self, payment: &Payment) -> GatewayOutcome;
}

/// Simulated gateway with a configurable processing delay
///
/// Approves every charge after `delay` and returns a synthetic provider
/// reference.
pub struct SimulatedGateway {
    delay: Duration,
}

impl SimulatedGateway {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn confirm(&self, payment: &Payment) -> GatewayOutcome {
        tokio::time::sleep(self.delay).await;
        tracing::debug!(
            payment_id = %payment.id,
            amount = payment.amount,
            "Simulated gateway approved charge"
        );
        GatewayOutcome::Success {
            reference: format!("SIM-{}", uuid::Uuid::new_v4()),
        }
    }
}

/// Gateway that returns a fixed outcome (tests)
pub struct StaticGateway {
    outcome: GatewayOutcome,
    delay: Duration,
}

impl StaticGateway {
    pub fn success() -> Self {
        Self {
            outcome: GatewayOutcome::Success {
                reference: "STATIC-REF".to_string(),
            },
            delay: Duration::ZERO,
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            outcome: GatewayOutcome::Failure {
                reason: reason.into(),
            },
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl PaymentGateway for StaticGateway {
    async fn confirm(&self, _payment: &Payment) -> GatewayOutcome {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome.clone()
    }
}

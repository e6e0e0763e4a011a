//! Asynchronous payment confirmation worker
//!
//! Consumes payment ids queued by `initiate_payment`, asks the gateway for
//! an outcome, and applies it through the engine. The gateway wait is
//! bounded: an overrun resolves the payment as failed with reason
//! "timeout". On startup the worker re-enqueues payments left in
//! `Processing` by a previous run, so a crash between commit and
//! confirmation cannot strand an attempt.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use shared::models::PaymentStatus;

use super::engine::SettlementEngine;
use super::gateway::{GatewayOutcome, PaymentGateway};
use super::traits::SettlementError;

pub struct ConfirmWorker {
    engine: Arc<SettlementEngine>,
    gateway: Arc<dyn PaymentGateway>,
    rx: mpsc::Receiver<String>,
    timeout: Duration,
    shutdown: CancellationToken,
}

impl ConfirmWorker {
    pub fn new(
        engine: Arc<SettlementEngine>,
        gateway: Arc<dyn PaymentGateway>,
        rx: mpsc::Receiver<String>,
        timeout: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            engine,
            gateway,
            rx,
            timeout,
            shutdown,
        }
    }

    /// Main loop: recovery scan, then drain the queue until shutdown
    pub async fn run(mut self) {
        tracing::info!("Confirmation worker started");

        if let Err(e) = self.recover().await {
            tracing::error!(error = %e, "Confirmation recovery scan failed");
        }

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Confirmation worker shutting down");
                    break;
                }
                maybe_id = self.rx.recv() => {
                    match maybe_id {
                        Some(payment_id) => self.process(&payment_id).await,
                        None => {
                            tracing::warn!("Confirmation queue closed");
                            break;
                        }
                    }
                }
            }
        }

        tracing::info!("Confirmation worker stopped");
    }

    /// Re-process payments a previous run left in `Processing`
    async fn recover(&self) -> Result<(), SettlementError> {
        let stranded = self.engine.storage().list_processing_payments()?;
        if stranded.is_empty() {
            return Ok(());
        }
        tracing::info!(count = stranded.len(), "Re-enqueuing stranded payments");
        for payment in stranded {
            self.process(&payment.id).await;
        }
        Ok(())
    }

    async fn process(&self, payment_id: &str) {
        let payment = match self.engine.storage().get_payment(payment_id) {
            Ok(Some(p)) => p,
            Ok(None) => {
                tracing::warn!(payment_id = %payment_id, "Queued payment no longer exists");
                return;
            }
            Err(e) => {
                tracing::error!(payment_id = %payment_id, error = %e, "Failed to load payment");
                return;
            }
        };

        // Cancelled while queued, or a duplicate delivery
        if payment.status != PaymentStatus::Processing {
            tracing::debug!(
                payment_id = %payment_id,
                status = ?payment.status,
                "Skipping already-resolved payment"
            );
            return;
        }

        let outcome =
            match tokio::time::timeout(self.timeout, self.gateway.confirm(&payment)).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::warn!(
                        payment_id = %payment_id,
                        timeout_ms = self.timeout.as_millis() as u64,
                        "Gateway confirmation timed out"
                    );
                    GatewayOutcome::Failure {
                        reason: "timeout".to_string(),
                    }
                }
            };

        match self.engine.confirm_payment(payment_id, outcome).await {
            Ok(_) => {}
            // Lost a race with cancellation; the outcome is already final
            Err(SettlementError::PaymentAlreadyResolved(_)) => {
                tracing::debug!(payment_id = %payment_id, "Payment resolved concurrently");
            }
            Err(e) => {
                tracing::error!(payment_id = %payment_id, error = %e, "Failed to apply outcome");
            }
        }
    }
}

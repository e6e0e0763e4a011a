//! Server state
//!
//! Shared handles behind every request: configuration, storage, the
//! settlement engine, and the JWT service. Cloning is shallow (Arc).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::auth::JwtService;
use crate::core::Config;
use crate::settlement::{ConfirmWorker, MarketStorage, SettlementEngine, SimulatedGateway};

/// Capacity of the confirmation queue; initiation never blocks on it in
/// practice because the worker drains continuously.
const CONFIRM_QUEUE_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub storage: MarketStorage,
    pub engine: Arc<SettlementEngine>,
    pub jwt_service: Arc<JwtService>,
    pub shutdown: CancellationToken,
}

impl ServerState {
    /// Initialize storage, engine and worker from configuration
    ///
    /// The returned worker must be spawned by the caller; it owns the
    /// receiving end of the confirmation queue.
    pub fn initialize(config: &Config) -> anyhow::Result<(Self, ConfirmWorker)> {
        config.ensure_data_dir()?;
        let storage = MarketStorage::open(config.database_path())?;
        Self::with_storage(config, storage)
    }

    /// Build state over existing storage (tests use in-memory storage)
    pub fn with_storage(
        config: &Config,
        storage: MarketStorage,
    ) -> anyhow::Result<(Self, ConfirmWorker)> {
        let (confirm_tx, confirm_rx) = mpsc::channel(CONFIRM_QUEUE_CAPACITY);

        let engine = Arc::new(SettlementEngine::new(
            storage.clone(),
            config.platform_fee_rate,
            confirm_tx,
        ));

        let shutdown = CancellationToken::new();
        let gateway = Arc::new(SimulatedGateway::new(Duration::from_millis(
            config.gateway_delay_ms,
        )));
        let worker = ConfirmWorker::new(
            engine.clone(),
            gateway,
            confirm_rx,
            Duration::from_millis(config.confirm_timeout_ms),
            shutdown.clone(),
        );

        let state = Self {
            config: config.clone(),
            storage,
            engine,
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            shutdown,
        };

        Ok((state, worker))
    }
}

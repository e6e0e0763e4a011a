//! Market Server - marketplace order settlement service
//!
//! # Architecture
//!
//! ```text
//! market-server/src/
//! ├── core/          # Config, state, server lifecycle
//! ├── auth/          # JWT authentication
//! ├── settlement/    # Order state machine, payments, fees, verification
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # Logger and shared error re-exports
//! ```
//!
//! The settlement module is the heart of the service: every state-changing
//! operation runs as one command inside one storage transaction, and payment
//! confirmation happens asynchronously in a dedicated worker.

pub mod api;
pub mod auth;
pub mod core;
pub mod settlement;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use settlement::{ConfirmWorker, MarketStorage, SettlementEngine, SettlementError};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use utils::logger::init_tracing;

/// Load .env and initialize logging from the environment
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_data_dir()?;

    init_tracing(&config.log_level, Some(config.log_dir().as_path()));

    Ok(())
}

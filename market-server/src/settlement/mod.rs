//! Order settlement
//!
//! The transactional core of the marketplace: order state machine, payment
//! confirmation, commission calculation, and the seller verification gate.
//!
//! # Structure
//!
//! - [`storage`] - redb tables and scans
//! - [`traits`] - command context, handler trait, error taxonomy
//! - [`fees`] - commission arithmetic on `rust_decimal`
//! - [`actions`] - one command handler per operation
//! - [`engine`] - transaction-per-command dispatcher
//! - [`gateway`] - payment provider boundary (simulated)
//! - [`confirm_worker`] - asynchronous confirmation task

pub mod actions;
pub mod confirm_worker;
pub mod engine;
pub mod fees;
pub mod gateway;
pub mod storage;
pub mod traits;

pub use confirm_worker::ConfirmWorker;
pub use engine::SettlementEngine;
pub use gateway::{GatewayOutcome, PaymentGateway, SimulatedGateway, StaticGateway};
pub use storage::{MarketStorage, StorageError};
pub use traits::{CallerContext, CommandContext, CommandHandler, SettlementError};

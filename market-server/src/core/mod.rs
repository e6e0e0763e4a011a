//! Core module - configuration, state and server lifecycle
//!
//! - [`Config`] - environment-driven configuration
//! - [`ServerState`] - shared handles behind every request
//! - [`Server`] - HTTP server

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;

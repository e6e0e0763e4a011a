//! Utilities
//!
//! - Logger setup
//! - Re-exported error types (from `shared::error`)

pub mod logger;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

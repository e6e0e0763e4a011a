//! Shared types for the marketplace backend
//!
//! Common types used across crates: error codes, API response structures,
//! and the domain models for the order settlement engine.

pub mod error;
pub mod models;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

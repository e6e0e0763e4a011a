//! Authentication
//!
//! - [`JwtService`] - token generation and validation
//! - [`CurrentUser`] - authenticated caller, extracted from the bearer token
//!
//! Role capability checks live on `shared::models::UserRole` and
//! `settlement::CallerContext`; handlers build a caller context from
//! [`CurrentUser`] and let the engine enforce permissions.

pub mod extractor;
pub mod jwt;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};

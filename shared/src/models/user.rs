//! User Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// User role
///
/// Promotion to `Seller` happens only as a side effect of a verification
/// reaching `Approved` — never by direct field update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Buyer,
    Seller,
    Admin,
}

impl UserRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Whether this role may create product listings
    pub fn can_list_products(&self) -> bool {
        matches!(self, UserRole::Seller | UserRole::Admin)
    }
}

/// Denormalized verification status mirrored onto the user
///
/// Derived cache of the latest verification's status. Written only inside
/// the same transaction as the owning verification record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserVerificationStatus {
    #[default]
    None,
    Pending,
    Approved,
    Rejected,
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub verification_status: UserVerificationStatus,
    pub created_at: DateTime<Utc>,
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(email)]
    pub email: String,
}

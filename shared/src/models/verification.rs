//! Seller Verification Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Verification request status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl VerificationStatus {
    /// Whether an admin decision has been recorded
    pub fn is_reviewed(&self) -> bool {
        !matches!(self, VerificationStatus::Pending)
    }
}

/// Admin review decision
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationDecision {
    Approve,
    Reject,
}

/// Seller verification request entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verification {
    pub id: String,
    /// Human-readable code ("VRF-20260827-0001")
    pub code: String,
    /// Applicant (immutable after submission)
    pub user_id: String,
    pub document_type: String,
    pub document_reference: String,
    pub status: VerificationStatus,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Admin who recorded the decision
    pub reviewed_by: Option<String>,
    /// Required when the decision is a rejection
    pub rejection_reason: Option<String>,
}

/// Submit verification payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerificationSubmit {
    #[validate(length(min = 1, max = 64))]
    pub document_type: String,
    #[validate(length(min = 1, max = 256))]
    pub document_reference: String,
}

/// Review verification payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerificationReview {
    pub decision: VerificationDecision,
    #[validate(length(max = 1000))]
    pub rejection_reason: Option<String>,
}

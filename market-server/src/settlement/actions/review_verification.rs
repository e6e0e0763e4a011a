//! ReviewVerification command handler
//!
//! Records an admin decision. Approval promotes the applicant to seller in
//! the same transaction; rejection requires a reason and leaves the role
//! untouched. A request is decided at most once.

use async_trait::async_trait;

use shared::models::{
    UserRole, UserVerificationStatus, Verification, VerificationDecision, VerificationReview,
    VerificationStatus,
};

use crate::settlement::traits::{
    CallerContext, CommandContext, CommandHandler, SettlementError,
};

pub struct ReviewVerificationAction {
    pub verification_id: String,
    pub payload: VerificationReview,
}

#[async_trait]
impl CommandHandler for ReviewVerificationAction {
    type Output = Verification;

    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        caller: &CallerContext,
    ) -> Result<Verification, SettlementError> {
        caller.require_admin()?;

        let mut verification = ctx.load_verification(&self.verification_id)?;
        if verification.status.is_reviewed() {
            return Err(SettlementError::VerificationAlreadyReviewed(
                verification.id.clone(),
            ));
        }

        let mut user = ctx.load_user(&verification.user_id)?;
        let now = ctx.now();

        match self.payload.decision {
            VerificationDecision::Approve => {
                verification.status = VerificationStatus::Approved;
                user.role = UserRole::Seller;
                user.verification_status = UserVerificationStatus::Approved;
            }
            VerificationDecision::Reject => {
                let reason = self
                    .payload
                    .rejection_reason
                    .as_deref()
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .ok_or(SettlementError::RejectionReasonRequired)?;
                verification.status = VerificationStatus::Rejected;
                verification.rejection_reason = Some(reason.to_string());
                user.verification_status = UserVerificationStatus::Rejected;
            }
        }

        verification.reviewed_at = Some(now);
        verification.reviewed_by = Some(caller.user_id.clone());

        ctx.store_verification(&verification)?;
        ctx.store_user(&user)?;

        Ok(verification)
    }
}

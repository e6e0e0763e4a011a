//! SubmitVerification command handler
//!
//! Opens a seller verification request. The user's denormalized
//! `verification_status` is written in the same transaction as the request,
//! so the cache can never disagree with the owning record.

use async_trait::async_trait;
use uuid::Uuid;

use shared::models::{
    UserVerificationStatus, Verification, VerificationStatus, VerificationSubmit,
};

use crate::settlement::traits::{
    CallerContext, CommandContext, CommandHandler, SettlementError,
};

pub struct SubmitVerificationAction {
    pub payload: VerificationSubmit,
}

#[async_trait]
impl CommandHandler for SubmitVerificationAction {
    type Output = Verification;

    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        caller: &CallerContext,
    ) -> Result<Verification, SettlementError> {
        let mut user = ctx.load_user(&caller.user_id)?;

        if user.role.can_list_products() {
            return Err(SettlementError::Validation(
                "user is already a verified seller".to_string(),
            ));
        }

        // At most one open request per user
        let existing = ctx
            .storage()
            .verifications_for_user_txn(ctx.txn(), &user.id)?;
        if existing.iter().any(|v| !v.status.is_reviewed()) {
            return Err(SettlementError::PendingVerificationExists(user.id.clone()));
        }

        if self.payload.document_type.trim().is_empty()
            || self.payload.document_reference.trim().is_empty()
        {
            return Err(SettlementError::Validation(
                "document type and reference are required".to_string(),
            ));
        }

        let verification = Verification {
            id: Uuid::new_v4().to_string(),
            code: ctx.next_verification_code()?,
            user_id: user.id.clone(),
            document_type: self.payload.document_type.clone(),
            document_reference: self.payload.document_reference.clone(),
            status: VerificationStatus::Pending,
            submitted_at: ctx.now(),
            reviewed_at: None,
            reviewed_by: None,
            rejection_reason: None,
        };

        ctx.store_verification(&verification)?;
        ctx.storage()
            .link_verification(ctx.txn(), &user.id, &verification.id)?;

        user.verification_status = UserVerificationStatus::Pending;
        ctx.store_user(&user)?;

        Ok(verification)
    }
}

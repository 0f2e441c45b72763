// Ring 3: Business - trimmed uniqueness within each rule's scope
use async_trait::async_trait;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing};
use crate::rules::check_conflict;
use crate::types::Operation;

#[derive(Default)]
pub struct ScopedUniquenessObserver;

#[async_trait]
impl Observer for ScopedUniquenessObserver {
    fn name(&self) -> &'static str {
        "ScopedUniquenessObserver"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::Business
    }

    fn applies_to_operation(&self, op: Operation) -> bool {
        matches!(op, Operation::Create | Operation::Update)
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        // An update never conflicts with itself
        let conflict = check_conflict(
            ctx.storage.as_ref(),
            ctx.entity,
            &ctx.rules,
            &ctx.candidate,
            ctx.record_id,
        )
        .await?;

        match conflict {
            Some(conflict) => Err(ObserverError::Conflict(conflict)),
            None => Ok(()),
        }
    }
}

// Ring 2: Integrity - refuse deletes while children still reference the record
use async_trait::async_trait;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing};
use crate::rules::check_deletable;
use crate::types::Operation;

#[derive(Default)]
pub struct DeleteGuardObserver;

#[async_trait]
impl Observer for DeleteGuardObserver {
    fn name(&self) -> &'static str {
        "DeleteGuardObserver"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::Integrity
    }

    fn applies_to_operation(&self, op: Operation) -> bool {
        op == Operation::Delete
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let Some(id) = ctx.record_id else {
            return Ok(());
        };
        match check_deletable(ctx.storage.as_ref(), ctx.entity, id).await? {
            Some(blocked) => Err(ObserverError::BlockedDeletion(blocked)),
            None => Ok(()),
        }
    }
}

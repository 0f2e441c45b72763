// Ring 2: Integrity - every parent reference on the candidate must resolve
use async_trait::async_trait;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing};
use crate::types::Operation;

#[derive(Default)]
pub struct ParentExistsObserver;

#[async_trait]
impl Observer for ParentExistsObserver {
    fn name(&self) -> &'static str {
        "ParentExistsObserver"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::Integrity
    }

    fn applies_to_operation(&self, op: Operation) -> bool {
        matches!(op, Operation::Create | Operation::Update)
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        for parent in ctx.entity.parents() {
            // Optional references may be absent
            let Some(id) = ctx.candidate_value(parent.field).and_then(|v| v.as_i64()) else {
                continue;
            };
            if ctx.storage.find_by_id(parent.target, id).await?.is_none() {
                return Err(ObserverError::MissingReference {
                    target: parent.target,
                    field: parent.field,
                    id,
                });
            }
        }
        Ok(())
    }
}

// Ring 0: Data Preparation - loads existing data and builds the candidate
use async_trait::async_trait;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing};
use crate::types::Operation;

/// Ring 0: turns the request body into the full column set to validate
#[derive(Default)]
pub struct DataPreparationObserver;

#[async_trait]
impl Observer for DataPreparationObserver {
    fn name(&self) -> &'static str {
        "DataPreparationObserver"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::DataPreparation
    }

    fn applies_to_operation(&self, _op: Operation) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        if let Some(id) = ctx.record_id {
            let current = ctx
                .storage
                .find_by_id(ctx.entity, id)
                .await?
                .ok_or(ObserverError::NotFound { entity: ctx.entity, id })?;
            ctx.current = Some(current);
        }

        let Some(input) = ctx.input.take() else {
            // Deletes carry no body
            return Ok(());
        };
        if !ctx.entity.is_writable() {
            return Err(ObserverError::ReadOnly(ctx.entity));
        }

        ctx.candidate = match &ctx.current {
            Some(current) => input.apply_to(current)?,
            None => input.into_new()?,
        };

        tracing::trace!("Prepared {} candidate: {:?}", ctx.entity, ctx.candidate);
        Ok(())
    }
}

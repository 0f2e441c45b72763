// Ring 4: Enrichment - negotiation dates and headcount derivation
use async_trait::async_trait;
use serde_json::Value;

use crate::database::graph::Entity;
use crate::database::models::{to_fields, Negotiation};
use crate::database::record::RecordError;
use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing};
use crate::rules::validate_negotiation;
use crate::types::Operation;

#[derive(Default)]
pub struct NegotiationConsistencyObserver;

#[async_trait]
impl Observer for NegotiationConsistencyObserver {
    fn name(&self) -> &'static str {
        "NegotiationConsistencyObserver"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::Enrichment
    }

    fn applies_to_operation(&self, op: Operation) -> bool {
        matches!(op, Operation::Create | Operation::Update)
    }

    fn applies_to_entity(&self, entity: Entity) -> bool {
        entity == Entity::Negotiation
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let candidate: Negotiation =
            serde_json::from_value(Value::Object(ctx.candidate.clone())).map_err(RecordError::from)?;

        let validated = validate_negotiation(candidate)?;
        ctx.candidate = to_fields(&validated)?;
        Ok(())
    }
}

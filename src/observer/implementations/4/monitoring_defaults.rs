// Ring 4: Enrichment - monitoring records inherit the negotiation start date
use async_trait::async_trait;
use serde_json::Value;

use crate::database::graph::Entity;
use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing};
use crate::types::Operation;

#[derive(Default)]
pub struct MonitoringDefaultsObserver;

#[async_trait]
impl Observer for MonitoringDefaultsObserver {
    fn name(&self) -> &'static str {
        "MonitoringDefaultsObserver"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::Enrichment
    }

    fn applies_to_operation(&self, op: Operation) -> bool {
        matches!(op, Operation::Create | Operation::Update)
    }

    fn applies_to_entity(&self, entity: Entity) -> bool {
        entity == Entity::Monitoring
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        if ctx.candidate_value("start_date").is_some() {
            return Ok(());
        }

        let negotiation_id = ctx
            .candidate_value("negotiation_id")
            .and_then(Value::as_i64)
            .ok_or_else(|| ObserverError::invalid_field("negotiation_id", "is required"))?;
        let negotiation = ctx
            .storage
            .find_by_id(Entity::Negotiation, negotiation_id)
            .await?
            .ok_or(ObserverError::MissingReference {
                target: Entity::Negotiation,
                field: "negotiation_id",
                id: negotiation_id,
            })?;

        match negotiation.get("start_date") {
            Some(start) => {
                tracing::debug!(
                    "Monitoring record defaults start_date to negotiation {} start {}",
                    negotiation_id,
                    start
                );
                let start = start.clone();
                ctx.candidate.insert("start_date".to_string(), start);
                Ok(())
            }
            None => Err(ObserverError::Validation(
                "start_date is required when the negotiation has no start date".to_string(),
            )),
        }
    }
}

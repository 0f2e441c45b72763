// Ring 5: Database - writes the validated candidate
use async_trait::async_trait;
use serde_json::Map;

use crate::database::record::Record;
use crate::database::storage::StorageError;
use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing};
use crate::rules::{check_conflict, check_deletable, Conflict};
use crate::types::Operation;

#[derive(Default)]
pub struct PersistObserver;

#[async_trait]
impl Observer for PersistObserver {
    fn name(&self) -> &'static str {
        "PersistObserver"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::Database
    }

    fn applies_to_operation(&self, _op: Operation) -> bool {
        true
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let outcome = match (ctx.operation, ctx.record_id) {
            (Operation::Create, _) => ctx.storage.create(ctx.entity, ctx.candidate.clone()).await,
            (Operation::Update, Some(id)) => ctx.storage.update(ctx.entity, id, ctx.candidate.clone()).await,
            (Operation::Delete, Some(id)) => ctx
                .storage
                .delete(ctx.entity, id)
                .await
                .map(|()| ctx.current.clone().unwrap_or_else(|| Record::new(id, Map::new()))),
            (_, None) => {
                return Err(ObserverError::Validation(format!(
                    "{:?} requires a record id",
                    ctx.operation
                )))
            }
        };

        match outcome {
            Ok(record) => {
                tracing::info!("{:?} {} {} persisted", ctx.operation, ctx.entity, record.id);
                ctx.result = Some(record);
                Ok(())
            }
            Err(error) => Err(backstop_error(ctx, error).await),
        }
    }
}

/// Translate a native constraint violation into the error the guards would have raised
async fn backstop_error(ctx: &ObserverContext, error: StorageError) -> ObserverError {
    match error {
        StorageError::NotFound { entity, id } => ObserverError::NotFound { entity, id },

        StorageError::UniqueViolation { ref constraint, .. } => {
            tracing::warn!("Unique backstop fired on {}: {}", ctx.entity, constraint);
            let found = check_conflict(
                ctx.storage.as_ref(),
                ctx.entity,
                &ctx.rules,
                &ctx.candidate,
                ctx.record_id,
            )
            .await;
            match found {
                Ok(Some(conflict)) => ObserverError::Conflict(conflict),
                _ => ObserverError::Conflict(Conflict {
                    entity: ctx.entity,
                    fields: Vec::new(),
                    scope: Vec::new(),
                    existing_id: None,
                }),
            }
        }

        StorageError::ForeignKeyViolation { ref constraint, .. } => {
            tracing::warn!("Foreign key backstop fired on {}: {}", ctx.entity, constraint);
            match (ctx.operation, ctx.record_id) {
                (Operation::Delete, Some(id)) => {
                    match check_deletable(ctx.storage.as_ref(), ctx.entity, id).await {
                        Ok(Some(blocked)) => ObserverError::BlockedDeletion(blocked),
                        _ => ObserverError::Storage(error),
                    }
                }
                _ => missing_parent(ctx).await.unwrap_or(ObserverError::Storage(error)),
            }
        }

        other => ObserverError::Storage(other),
    }
}

/// The parent that vanished between the integrity check and the write
async fn missing_parent(ctx: &ObserverContext) -> Option<ObserverError> {
    for parent in ctx.entity.parents() {
        let Some(id) = ctx.candidate_value(parent.field).and_then(|v| v.as_i64()) else {
            continue;
        };
        if let Ok(None) = ctx.storage.find_by_id(parent.target, id).await {
            return Some(ObserverError::MissingReference {
                target: parent.target,
                field: parent.field,
                id,
            });
        }
    }
    None
}

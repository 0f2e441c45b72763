use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::config::RulesConfig;
use crate::database::graph::Entity;
use crate::database::models::Input;
use crate::database::record::Record;
use crate::database::storage::Storage;
use crate::filter::Filter;
use crate::observer::{ObserverContext, ObserverError, ObserverPipeline, ObserverRing};

/// Candidate that passed every check but was not written
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedRecord {
    pub entity: Entity,
    pub id: Option<i64>,
    pub fields: Map<String, Value>,
}

/// Entry point for reads and writes on every entity.
///
/// Writes run through the observer pipeline; a rejection in any ring
/// before `Database` leaves storage untouched.
#[derive(Clone)]
pub struct RecordService {
    storage: Arc<dyn Storage>,
    rules: RulesConfig,
    pipeline: Arc<ObserverPipeline>,
}

impl RecordService {
    pub fn new(storage: Arc<dyn Storage>, rules: RulesConfig) -> Self {
        Self {
            storage,
            rules,
            pipeline: Arc::new(ObserverPipeline::with_default_observers()),
        }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    pub async fn validate_create(&self, entity: Entity, body: Value) -> Result<ValidatedRecord, ObserverError> {
        let ctx = self.run_create(entity, body, ObserverRing::Enrichment).await?;
        Ok(validated(ctx))
    }

    pub async fn validate_update(&self, entity: Entity, id: i64, body: Value) -> Result<ValidatedRecord, ObserverError> {
        let ctx = self.run_update(entity, id, body, ObserverRing::Enrichment).await?;
        Ok(validated(ctx))
    }

    pub async fn validate_delete(&self, entity: Entity, id: i64) -> Result<(), ObserverError> {
        self.run_delete(entity, id, ObserverRing::Integrity).await?;
        Ok(())
    }

    pub async fn create(&self, entity: Entity, body: Value) -> Result<Record, ObserverError> {
        let ctx = self.run_create(entity, body, ObserverRing::Database).await?;
        persisted(ctx)
    }

    pub async fn update(&self, entity: Entity, id: i64, body: Value) -> Result<Record, ObserverError> {
        let ctx = self.run_update(entity, id, body, ObserverRing::Database).await?;
        persisted(ctx)
    }

    /// Delete a record, returning its last stored state
    pub async fn delete(&self, entity: Entity, id: i64) -> Result<Record, ObserverError> {
        let ctx = self.run_delete(entity, id, ObserverRing::Database).await?;
        persisted(ctx)
    }

    pub async fn get(&self, entity: Entity, id: i64) -> Result<Record, ObserverError> {
        self.storage
            .find_by_id(entity, id)
            .await?
            .ok_or(ObserverError::NotFound { entity, id })
    }

    /// Every record of `entity`, ordered by id
    pub async fn list(&self, entity: Entity) -> Result<Vec<Record>, ObserverError> {
        Ok(self.storage.find_all(entity, &Filter::new()).await?)
    }

    async fn run_create(&self, entity: Entity, body: Value, through: ObserverRing) -> Result<ObserverContext, ObserverError> {
        let input = Input::from_json(entity, body)?;
        let mut ctx = ObserverContext::create(self.storage.clone(), self.rules.clone(), input);
        self.pipeline.execute(&mut ctx, through).await?;
        Ok(ctx)
    }

    async fn run_update(
        &self,
        entity: Entity,
        id: i64,
        body: Value,
        through: ObserverRing,
    ) -> Result<ObserverContext, ObserverError> {
        // Report a missing target before complaining about its body
        if self.storage.find_by_id(entity, id).await?.is_none() {
            return Err(ObserverError::NotFound { entity, id });
        }
        let input = Input::from_json(entity, body)?;
        let mut ctx = ObserverContext::update(self.storage.clone(), self.rules.clone(), id, input);
        self.pipeline.execute(&mut ctx, through).await?;
        Ok(ctx)
    }

    async fn run_delete(&self, entity: Entity, id: i64, through: ObserverRing) -> Result<ObserverContext, ObserverError> {
        let mut ctx = ObserverContext::delete(self.storage.clone(), self.rules.clone(), entity, id);
        self.pipeline.execute(&mut ctx, through).await?;
        Ok(ctx)
    }
}

fn validated(ctx: ObserverContext) -> ValidatedRecord {
    ValidatedRecord {
        entity: ctx.entity,
        id: ctx.record_id,
        fields: ctx.candidate,
    }
}

fn persisted(ctx: ObserverContext) -> Result<Record, ObserverError> {
    let entity = ctx.entity;
    ctx.result.ok_or_else(|| ObserverError::Validation(format!("{} was not persisted", entity)))
}

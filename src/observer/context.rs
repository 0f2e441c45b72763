use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;

use crate::config::RulesConfig;
use crate::database::graph::Entity;
use crate::database::models::Input;
use crate::database::record::Record;
use crate::database::storage::Storage;
use crate::observer::traits::ObserverRing;
use crate::types::Operation;

/// State that flows through the observer pipeline for one request
pub struct ObserverContext {
    // Core request data
    pub operation: Operation,
    pub entity: Entity,
    pub record_id: Option<i64>,

    /// Request body, consumed by ring 0
    pub input: Option<Input>,

    /// Stored state before the operation (updates and deletes)
    pub current: Option<Record>,

    /// Column values to persist, built in ring 0 and refined by rings 1-4
    pub candidate: Map<String, Value>,

    /// Persisted record (populated by ring 5)
    pub result: Option<Record>,

    // Collaborators
    pub storage: Arc<dyn Storage>,
    pub rules: RulesConfig,

    // Performance tracking
    pub start_time: Instant,
    pub current_ring: Option<ObserverRing>,
}

impl ObserverContext {
    pub fn create(storage: Arc<dyn Storage>, rules: RulesConfig, input: Input) -> Self {
        let entity = input.entity();
        Self::new(Operation::Create, entity, None, Some(input), storage, rules)
    }

    pub fn update(storage: Arc<dyn Storage>, rules: RulesConfig, id: i64, input: Input) -> Self {
        let entity = input.entity();
        Self::new(Operation::Update, entity, Some(id), Some(input), storage, rules)
    }

    pub fn delete(storage: Arc<dyn Storage>, rules: RulesConfig, entity: Entity, id: i64) -> Self {
        Self::new(Operation::Delete, entity, Some(id), None, storage, rules)
    }

    fn new(
        operation: Operation,
        entity: Entity,
        record_id: Option<i64>,
        input: Option<Input>,
        storage: Arc<dyn Storage>,
        rules: RulesConfig,
    ) -> Self {
        Self {
            operation,
            entity,
            record_id,
            input,
            current: None,
            candidate: Map::new(),
            result: None,
            storage,
            rules,
            start_time: Instant::now(),
            current_ring: None,
        }
    }

    /// Non-null candidate value
    pub fn candidate_value(&self, field: &str) -> Option<&Value> {
        self.candidate.get(field).filter(|v| !v.is_null())
    }

    /// Get total execution time
    pub fn execution_time(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }
}

impl std::fmt::Debug for ObserverContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverContext")
            .field("operation", &self.operation)
            .field("entity", &self.entity)
            .field("record_id", &self.record_id)
            .field("candidate", &self.candidate)
            .field("current_ring", &self.current_ring)
            .finish()
    }
}

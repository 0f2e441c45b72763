//! Helpers for unit tests that run against the in-memory store.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::config::RulesConfig;
use crate::database::graph::Entity;
use crate::database::memory::MemoryStorage;
use crate::database::storage::Storage;
use crate::services::RecordService;

/// Unwrap a JSON object literal into a field map
pub fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected JSON object, got {}", other),
    }
}

/// Insert a row directly, bypassing the pipeline. Returns the new id.
pub async fn seed(storage: &dyn Storage, entity: Entity, value: Value) -> i64 {
    storage
        .create(entity, fields(value))
        .await
        .expect("seed insert")
        .id
}

/// Service over a fresh in-memory store with default rules
pub fn memory_service() -> (Arc<MemoryStorage>, RecordService) {
    let storage = Arc::new(MemoryStorage::new());
    let service = RecordService::new(storage.clone(), RulesConfig::default());
    (storage, service)
}

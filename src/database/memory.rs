use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::database::graph::Entity;
use crate::database::record::Record;
use crate::database::storage::{Storage, StorageError};
use crate::filter::Filter;

#[derive(Debug, Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Map<String, Value>>,
}

/// Process-local store for tests and `serve --memory`.
///
/// No native constraints are enforced; all consistency comes from the
/// request pipeline.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tables: RwLock<HashMap<Entity, Table>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn find_by_id(&self, entity: Entity, id: i64) -> Result<Option<Record>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(&entity)
            .and_then(|t| t.rows.get(&id))
            .map(|fields| Record::new(id, fields.clone())))
    }

    async fn find_one(&self, entity: Entity, filter: &Filter) -> Result<Option<Record>, StorageError> {
        Ok(self.find_all(entity, filter).await?.into_iter().next())
    }

    async fn find_all(&self, entity: Entity, filter: &Filter) -> Result<Vec<Record>, StorageError> {
        let tables = self.tables.read().await;
        let Some(table) = tables.get(&entity) else {
            return Ok(Vec::new());
        };
        Ok(table
            .rows
            .iter()
            .map(|(id, fields)| Record::new(*id, fields.clone()))
            .filter(|record| filter.matches(record))
            .collect())
    }

    async fn count(&self, entity: Entity, filter: &Filter) -> Result<i64, StorageError> {
        let tables = self.tables.read().await;
        let count = tables
            .get(&entity)
            .map(|table| {
                table
                    .rows
                    .iter()
                    .filter(|(id, fields)| filter.matches(&Record::new(**id, (*fields).clone())))
                    .count()
            })
            .unwrap_or(0);
        Ok(count as i64)
    }

    async fn create(&self, entity: Entity, fields: Map<String, Value>) -> Result<Record, StorageError> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(entity).or_default();
        table.next_id += 1;
        let record = Record::new(table.next_id, fields);
        table.rows.insert(record.id, record.fields.clone());
        Ok(record)
    }

    async fn update(&self, entity: Entity, id: i64, fields: Map<String, Value>) -> Result<Record, StorageError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(&entity)
            .and_then(|t| t.rows.get_mut(&id))
            .ok_or(StorageError::NotFound { entity, id })?;
        for (key, value) in fields {
            if key != "id" {
                row.insert(key, value);
            }
        }
        Ok(Record::new(id, row.clone()))
    }

    async fn delete(&self, entity: Entity, id: i64) -> Result<(), StorageError> {
        let mut tables = self.tables.write().await;
        tables
            .get_mut(&entity)
            .and_then(|t| t.rows.remove(&id))
            .map(|_| ())
            .ok_or(StorageError::NotFound { entity, id })
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn assigns_sequential_ids_per_entity() {
        let storage = MemoryStorage::new();
        let a = storage.create(Entity::Principal, fields(json!({"name": "A"}))).await.unwrap();
        let b = storage.create(Entity::Principal, fields(json!({"name": "B"}))).await.unwrap();
        let u = storage.create(Entity::Union, fields(json!({"name": "U"}))).await.unwrap();
        assert_eq!((a.id, b.id, u.id), (1, 2, 1));
    }

    #[tokio::test]
    async fn update_and_delete_missing_rows_report_not_found() {
        let storage = MemoryStorage::new();
        let err = storage.update(Entity::Role, 5, Map::new()).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { entity: Entity::Role, id: 5 }));
        let err = storage.delete(Entity::Role, 5).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[tokio::test]
    async fn count_and_find_use_filter() {
        let storage = MemoryStorage::new();
        for (principal, name) in [(1, "A"), (1, "B"), (2, "C")] {
            storage
                .create(
                    Entity::Contractor,
                    fields(json!({"principal_id": principal, "name": name, "tax_id": name})),
                )
                .await
                .unwrap();
        }
        let filter = Filter::new().eq("principal_id", 1);
        assert_eq!(storage.count(Entity::Contractor, &filter).await.unwrap(), 2);
        let first = storage.find_one(Entity::Contractor, &filter).await.unwrap().unwrap();
        assert_eq!(first.get_str("name"), Some("A"));
        assert_eq!(storage.find_all(Entity::Contractor, &Filter::new()).await.unwrap().len(), 3);
    }
}

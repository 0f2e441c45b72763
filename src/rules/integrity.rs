use serde::Serialize;
use std::fmt;

use crate::database::graph::Entity;
use crate::database::storage::{Storage, StorageError};
use crate::filter::Filter;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dependent {
    pub entity: Entity,
    pub field: &'static str,
    pub count: i64,
}

/// Deletion refused because child records still reference the target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Blocked {
    pub entity: Entity,
    pub id: i64,
    pub total: i64,
    pub dependents: Vec<Dependent>,
}

impl fmt::Display for Blocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<String> = self
            .dependents
            .iter()
            .map(|d| format!("{} {}", d.count, d.entity))
            .collect();
        write!(
            f,
            "Cannot delete {} {}: referenced by {} dependent record(s) ({})",
            self.entity,
            self.id,
            self.total,
            kinds.join(", ")
        )
    }
}

/// Count children referencing `entity`/`id` across every declared relation.
pub async fn check_deletable(storage: &dyn Storage, entity: Entity, id: i64) -> Result<Option<Blocked>, StorageError> {
    let mut dependents = Vec::new();
    for relation in entity.children() {
        let count = storage
            .count(relation.entity, &Filter::new().eq(relation.field, id))
            .await?;
        if count > 0 {
            dependents.push(Dependent {
                entity: relation.entity,
                field: relation.field,
                count,
            });
        }
    }

    let total: i64 = dependents.iter().map(|d| d.count).sum();
    if total == 0 {
        return Ok(None);
    }
    Ok(Some(Blocked { entity, id, total, dependents }))
}

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::config::RulesConfig;
use crate::database::graph::{Entity, UniqueRule};
use crate::database::storage::{Storage, StorageError};
use crate::filter::Filter;

/// An existing record already holds the candidate's unique values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conflict {
    pub entity: Entity,
    pub fields: Vec<&'static str>,
    pub scope: Vec<&'static str>,
    /// Unknown only when a storage backstop fired and the row could not be found again
    pub existing_id: Option<i64>,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            return write!(f, "{} conflicts with an existing record", self.entity);
        }
        write!(f, "A {} with the same {} already exists", self.entity, self.fields.join(", "))?;
        if !self.scope.is_empty() {
            write!(f, " for this {}", self.scope.join(" and "))?;
        }
        Ok(())
    }
}

/// Check every uniqueness rule of `entity` against `candidate`, returning the first violation.
pub async fn check_conflict(
    storage: &dyn Storage,
    entity: Entity,
    rules: &RulesConfig,
    candidate: &Map<String, Value>,
    exclude_id: Option<i64>,
) -> Result<Option<Conflict>, StorageError> {
    for rule in entity.unique_rules(rules) {
        if let Some(conflict) = check_rule(storage, entity, &rule, candidate, exclude_id).await? {
            return Ok(Some(conflict));
        }
    }
    Ok(None)
}

async fn check_rule(
    storage: &dyn Storage,
    entity: Entity,
    rule: &UniqueRule,
    candidate: &Map<String, Value>,
    exclude_id: Option<i64>,
) -> Result<Option<Conflict>, StorageError> {
    let mut filter = Filter::new();
    for column in rule.columns() {
        let value = match candidate.get(column) {
            Some(value) if !value.is_null() => value,
            // Nothing to collide with
            _ => return Ok(None),
        };
        filter = match value.as_str() {
            Some(s) => filter.trim_eq(column, s.trim()),
            None => filter.eq(column, value.clone()),
        };
    }
    let filter = filter.exclude_id(exclude_id);

    let existing = storage.find_one(entity, &filter).await?;
    Ok(existing.map(|record| Conflict {
        entity,
        fields: rule.fields.to_vec(),
        scope: rule.scope.to_vec(),
        existing_id: Some(record.id),
    }))
}

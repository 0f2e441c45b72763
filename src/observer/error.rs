use thiserror::Error;

use crate::database::graph::Entity;
use crate::database::models::ModelError;
use crate::database::record::RecordError;
use crate::database::storage::StorageError;
use crate::rules::{Blocked, Conflict, RuleViolation};

/// Rejections raised while running the observer pipeline
#[derive(Debug, Error)]
pub enum ObserverError {
    /// A parent id on the candidate does not exist
    #[error("{field} references {target} {id}, which does not exist")]
    MissingReference { target: Entity, field: &'static str, id: i64 },

    /// The record being updated or deleted does not exist
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: i64 },

    #[error("{0}")]
    Conflict(Conflict),

    #[error("{0}")]
    Validation(String),

    #[error("{field} {message}")]
    InvalidField { field: String, message: String },

    #[error("{0}")]
    BlockedDeletion(Blocked),

    #[error("{0} records are read-only")]
    ReadOnly(Entity),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ObserverError {
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ObserverError::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<RuleViolation> for ObserverError {
    fn from(violation: RuleViolation) -> Self {
        ObserverError::Validation(violation.to_string())
    }
}

impl From<ModelError> for ObserverError {
    fn from(error: ModelError) -> Self {
        match error {
            ModelError::MissingField(field) => ObserverError::invalid_field(field, "is required"),
            ModelError::InvalidBody { .. } => ObserverError::Validation(error.to_string()),
            ModelError::ReadOnly(entity) => ObserverError::ReadOnly(entity),
            ModelError::Record(e) => e.into(),
        }
    }
}

impl From<RecordError> for ObserverError {
    fn from(error: RecordError) -> Self {
        ObserverError::Storage(StorageError::Record(error))
    }
}

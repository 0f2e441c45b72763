use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::database::graph::Entity;
use crate::database::manager::DatabaseError;
use crate::database::record::{Record, RecordError};
use crate::filter::{Filter, FilterError};

#[derive(Debug, Error)]
pub enum StorageError {
    /// A native unique index rejected the write
    #[error("Unique constraint violated on {entity}: {constraint}")]
    UniqueViolation { entity: Entity, constraint: String },

    /// A native foreign key rejected the write or delete
    #[error("Foreign key constraint violated on {entity}: {constraint}")]
    ForeignKeyViolation { entity: Entity, constraint: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: i64 },

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Data access used by the consistency rules and the request pipeline.
///
/// ## Consistency contract
///
/// The uniqueness and delete guards read through this trait and then write
/// through it in a separate call. Implementations backed by a shared store
/// must enforce the same invariants natively (unique indexes on the trimmed
/// columns, `RESTRICT` foreign keys) and report violations as
/// `UniqueViolation` / `ForeignKeyViolation` so concurrent writers that both
/// pass the guards cannot persist inconsistent state.
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync + 'static` to be shared through
/// axum application state.
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    async fn find_by_id(&self, entity: Entity, id: i64) -> Result<Option<Record>, StorageError>;

    /// First record (lowest id) matching `filter`
    async fn find_one(&self, entity: Entity, filter: &Filter) -> Result<Option<Record>, StorageError>;

    /// All records matching `filter`, ordered by id
    async fn find_all(&self, entity: Entity, filter: &Filter) -> Result<Vec<Record>, StorageError>;

    async fn count(&self, entity: Entity, filter: &Filter) -> Result<i64, StorageError>;

    async fn create(&self, entity: Entity, fields: Map<String, Value>) -> Result<Record, StorageError>;

    /// Overwrite the given columns. Returns `NotFound` if the record vanished.
    async fn update(&self, entity: Entity, id: i64, fields: Map<String, Value>) -> Result<Record, StorageError>;

    /// Returns `NotFound` if nothing was deleted.
    async fn delete(&self, entity: Entity, id: i64) -> Result<(), StorageError>;

    async fn health_check(&self) -> Result<(), StorageError>;
}

pub mod graph;
pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod query_builder;
pub mod record;
pub mod storage;

pub use graph::{Entity, FieldDef, FieldKind, ParentRef, Relation, UniqueRule};
pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStorage;
pub use postgres::PgStorage;
pub use record::{Record, RecordError};
pub use storage::{Storage, StorageError};

use async_trait::async_trait;

use crate::database::graph::Entity;
use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::types::Operation;

/// Observer rings with semantic meaning, executed in ascending order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ObserverRing {
    DataPreparation = 0,    // Load existing data, merge updates
    InputValidation = 1,    // Field shape: required, trimming, lengths
    Integrity = 2,          // Parent existence, delete protection
    Business = 3,           // Scoped uniqueness
    Enrichment = 4,         // Derived fields, defaults, consistency
    Database = 5,           // Persistence
}

impl ObserverRing {
    /// Rings that never write
    pub fn is_validation(&self) -> bool {
        (*self as u8) < 5
    }

    /// Get all rings for an operation type
    pub fn for_operation(operation: Operation) -> Vec<Self> {
        use ObserverRing::*;

        match operation {
            Operation::Create | Operation::Update => {
                vec![DataPreparation, InputValidation, Integrity, Business, Enrichment, Database]
            }
            Operation::Delete => vec![DataPreparation, Integrity, Database],
        }
    }
}

/// A single step of the pipeline
#[async_trait]
pub trait Observer: Send + Sync {
    /// Observer name for logging and debugging
    fn name(&self) -> &'static str;

    /// Which ring this observer belongs to
    fn ring(&self) -> ObserverRing;

    /// Check if observer applies to this operation
    fn applies_to_operation(&self, op: Operation) -> bool;

    /// Check if observer applies to this entity
    fn applies_to_entity(&self, _entity: Entity) -> bool {
        true
    }

    /// Priority within ring (lower numbers execute first)
    fn priority(&self) -> u8 {
        50
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError>;
}

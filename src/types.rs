/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Mutating operations routed through the observer pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

// Observer implementations organized by rings
// Each ring handles a specific phase of a write

// Ring 0: Data Preparation - load existing data, merge updates
#[path = "0/data_preparation.rs"]
pub mod data_preparation;

// Ring 1: Input Validation - field shape
#[path = "1/field_rules.rs"]
pub mod field_rules;

// Ring 2: Integrity - references in both directions
#[path = "2/parent_exists.rs"]
pub mod parent_exists;
#[path = "2/delete_guard.rs"]
pub mod delete_guard;

// Ring 3: Business - scoped uniqueness
#[path = "3/scoped_uniqueness.rs"]
pub mod scoped_uniqueness;

// Ring 4: Enrichment - derived values and defaults
#[path = "4/negotiation_consistency.rs"]
pub mod negotiation_consistency;
#[path = "4/monitoring_defaults.rs"]
pub mod monitoring_defaults;

// Ring 5: Database - persistence
#[path = "5/persist.rs"]
pub mod persist;

pub use data_preparation::*;
pub use field_rules::*;
pub use parent_exists::*;
pub use delete_guard::*;
pub use scoped_uniqueness::*;
pub use negotiation_consistency::*;
pub use monitoring_defaults::*;
pub use persist::*;

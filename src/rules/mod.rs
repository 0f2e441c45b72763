//! Consistency and referential-integrity rules.
//!
//! Guards that need existing state take the storage collaborator as an
//! argument; the negotiation validator is a pure function.

pub mod integrity;
pub mod negotiation;
pub mod uniqueness;

pub use integrity::{check_deletable, Blocked, Dependent};
pub use negotiation::{validate as validate_negotiation, RuleViolation, MAX_TERM_MONTHS};
pub use uniqueness::{check_conflict, Conflict};

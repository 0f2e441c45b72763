// Observer system: every write runs through numbered rings of observers.
// Rings 0-4 validate and shape the candidate, ring 5 persists it.

pub mod context;
pub mod traits;
pub mod pipeline;
pub mod error;
pub mod implementations;

// Re-export core types
pub use context::*;
pub use traits::*;
pub use pipeline::*;
pub use error::*;

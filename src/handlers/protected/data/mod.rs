pub mod entity;
pub mod record;
pub mod utils;

// Re-export handler functions for use in routing
pub use entity::get as entity_get;
pub use entity::post as entity_post;

pub use record::delete as record_delete;
pub use record::get as record_get;
pub use record::put as record_put;

// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Route Prefix: /api/:entity
// Reads need a valid token; POST/PUT/DELETE also need the admin role.
pub mod data;

pub use data::*;

// handlers/mod.rs - two-tier handler layout
//
// Public (no auth) → Protected (JWT auth, writes additionally need the admin role)
pub mod public;    // Tier 1: banner and health
pub mod protected; // Tier 2: entity CRUD under /api/*

pub use public::*;
pub use protected::*;

use crate::services::RecordService;

/// Shared state handed to every handler and middleware
#[derive(Clone)]
pub struct AppState {
    pub service: RecordService,
    pub jwt_secret: String,
    pub admin_role: String,
}

impl AppState {
    pub fn new(service: RecordService, jwt_secret: impl Into<String>, admin_role: impl Into<String>) -> Self {
        Self {
            service,
            jwt_secret: jwt_secret.into(),
            admin_role: admin_role.into(),
        }
    }
}

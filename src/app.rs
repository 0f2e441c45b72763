use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::SecurityConfig;
use crate::handlers::{self, AppState};
use crate::middleware::{jwt_auth_middleware, require_admin_middleware};

/// Full router: public endpoints, authenticated reads and admin-only writes
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Protected API
        .merge(read_routes(state.clone()))
        .merge(write_routes(state.clone()))
        .with_state(state)
}

fn read_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/:entity", get(handlers::entity_get))
        .route("/api/:entity/:id", get(handlers::record_get))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn write_routes(state: AppState) -> Router<AppState> {
    // Layers run outermost-last: authentication before the role check
    Router::new()
        .route("/api/:entity", post(handlers::entity_post))
        .route("/api/:entity/:id", put(handlers::record_put).delete(handlers::record_delete))
        .route_layer(from_fn_with_state(state.clone(), require_admin_middleware))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

/// CORS from configuration; `None` when disabled
pub fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }
    if security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn security(enable_cors: bool, origins: &[&str]) -> SecurityConfig {
        SecurityConfig {
            jwt_secret: "x".to_string(),
            admin_role: "Administrador".to_string(),
            enable_cors,
            cors_origins: origins.iter().map(|o| o.to_string()).collect(),
        }
    }

    #[test]
    fn cors_follows_configuration() {
        assert!(cors_layer(&security(false, &["*"])).is_none());
        assert!(cors_layer(&security(true, &["*"])).is_some());
        assert!(cors_layer(&security(true, &["http://localhost:5173"])).is_some());
    }
}

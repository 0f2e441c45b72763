// handlers/public/mod.rs - endpoints reachable without a token

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use super::AppState;

/// GET / - service banner
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "NCC API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Industrial relations registry: principals, contractors, unions, negotiations",
        "endpoints": {
            "health": "/health",
            "data": "/api/:entity[/:id]"
        }
    }))
}

/// GET /health - storage round trip
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.service.storage().health_check().await {
        Ok(()) => (StatusCode::OK, Json(json!({"status": "ok", "database": "up"}))),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"status": "error", "database": "down"})),
            )
        }
    }
}

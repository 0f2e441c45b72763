use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::Value;

use crate::database::graph::Entity;
use crate::error::ApiError;

/// Resolve the `:entity` path segment; unknown collections are 404
pub fn parse_entity(segment: &str) -> Result<Entity, ApiError> {
    Entity::from_segment(segment).ok_or_else(|| ApiError::not_found(format!("Unknown collection '{}'", segment)))
}

/// Ids are positive integers
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::bad_request(format!("Invalid id '{}': expected a positive integer", raw))),
    }
}

/// Unwrap a JSON body, reporting malformed input in the API error envelope
pub fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(ApiError::invalid_json(rejection.body_text())),
    }
}

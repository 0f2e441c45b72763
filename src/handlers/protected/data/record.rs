use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::Value;

use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};

use super::utils::{json_body, parse_entity, parse_id};

/// GET /api/:entity/:id - Get a single record by ID
pub async fn get(State(state): State<AppState>, Path((segment, id)): Path<(String, String)>) -> ApiResult<Value> {
    let entity = parse_entity(&segment)?;
    let id = parse_id(&id)?;
    let record = state.service.get(entity, id).await?;
    Ok(ApiResponse::success(record.to_api_output()))
}

/// PUT /api/:entity/:id - partial update; absent fields keep their stored value
pub async fn put(
    State(state): State<AppState>,
    Path((segment, id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let entity = parse_entity(&segment)?;
    let id = parse_id(&id)?;
    let body = json_body(body)?;
    let record = state.service.update(entity, id, body).await?;
    Ok(ApiResponse::success(record.to_api_output()))
}

/// DELETE /api/:entity/:id - returns the deleted record
pub async fn delete(State(state): State<AppState>, Path((segment, id)): Path<(String, String)>) -> ApiResult<Value> {
    let entity = parse_entity(&segment)?;
    let id = parse_id(&id)?;
    let record = state.service.delete(entity, id).await?;
    Ok(ApiResponse::success(record.to_api_output()))
}

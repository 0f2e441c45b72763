use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::Value;

use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};

use super::utils::{json_body, parse_entity};

/// GET /api/:entity - all records ordered by id
pub async fn get(State(state): State<AppState>, Path(segment): Path<String>) -> ApiResult<Vec<Value>> {
    let entity = parse_entity(&segment)?;
    let records = state.service.list(entity).await?;
    Ok(ApiResponse::success(records.iter().map(|r| r.to_api_output()).collect()))
}

/// POST /api/:entity - create one record
pub async fn post(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let entity = parse_entity(&segment)?;
    let body = json_body(body)?;
    let record = state.service.create(entity, body).await?;
    Ok(ApiResponse::created(record.to_api_output()))
}

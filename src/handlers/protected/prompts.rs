// Prompt template management: GET /api/prompts/:key, PUT /api/prompts/:key

use std::collections::HashMap;

use axum::extract::Path;
use axum::response::Json;
use serde_json::Value;

use crate::database::manager::DatabaseManager;
use crate::database::repository::{PromptRecord, PromptRepository};
use crate::error::ApiError;
use crate::handlers::{body_map, params_map, validated};
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::validation::registry::{PROMPT_GET_PARAMS, PROMPT_UPDATE_BODY};

pub async fn prompt_get(Path(params): Path<HashMap<String, String>>) -> ApiResult<PromptRecord> {
    let payload = validated(PROMPT_GET_PARAMS, &params_map(&params))?;
    let key = payload
        .str("key")
        .ok_or_else(|| ApiError::internal_server_error("validated payload missing key"))?;

    let pool = DatabaseManager::pool().await?;
    let prompt = PromptRepository::get(&pool, key).await?;
    Ok(ApiResponse::success(prompt))
}

pub async fn prompt_put(
    Path(params): Path<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> ApiResult<PromptRecord> {
    let params_payload = validated(PROMPT_GET_PARAMS, &params_map(&params))?;
    let body_payload = validated(PROMPT_UPDATE_BODY, &body_map(&body)?)?;

    let key = params_payload
        .str("key")
        .ok_or_else(|| ApiError::internal_server_error("validated payload missing key"))?;
    let value = body_payload
        .str("value")
        .ok_or_else(|| ApiError::internal_server_error("validated payload missing value"))?;

    let pool = DatabaseManager::pool().await?;
    let prompt = PromptRepository::update(&pool, key, value).await?;
    tracing::info!(key, "prompt updated");
    Ok(ApiResponse::success(prompt))
}

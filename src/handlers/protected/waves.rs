// Wave management: GET /api/teams/:id/waves/:waveId, POST /api/teams/:id/waves

use std::collections::HashMap;

use axum::extract::Path;
use axum::response::Json;
use serde_json::Value;

use crate::database::manager::DatabaseManager;
use crate::database::repository::{TeamRepository, WaveRecord, WaveRepository};
use crate::error::ApiError;
use crate::handlers::{body_map, params_map, validated};
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::validation::registry::{TEAM_ID_PARAMS, WAVE_CREATE_BODY, WAVE_ID_PARAMS};

pub async fn wave_get(Path(params): Path<HashMap<String, String>>) -> ApiResult<WaveRecord> {
    let payload = validated(WAVE_ID_PARAMS, &params_map(&params))?;
    let team_id = payload
        .int("id")
        .ok_or_else(|| ApiError::internal_server_error("validated payload missing id"))?;
    let wave_id = payload
        .int("waveId")
        .ok_or_else(|| ApiError::internal_server_error("validated payload missing waveId"))?;

    let pool = DatabaseManager::pool().await?;
    let wave = WaveRepository::get(&pool, team_id, wave_id).await?;
    Ok(ApiResponse::success(wave))
}

pub async fn wave_post(
    Path(params): Path<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> ApiResult<WaveRecord> {
    let params_payload = validated(TEAM_ID_PARAMS, &params_map(&params))?;
    let body_payload = validated(WAVE_CREATE_BODY, &body_map(&body)?)?;

    let team_id = params_payload
        .int("id")
        .ok_or_else(|| ApiError::internal_server_error("validated payload missing id"))?;
    // Optional with no default: an absent name reaches the store as NULL.
    let name = body_payload.str("name");

    let pool = DatabaseManager::pool().await?;
    // Creating a wave under a missing team is a 404, not a constraint error.
    TeamRepository::get(&pool, team_id).await?;
    let wave = WaveRepository::create(&pool, team_id, name).await?;
    tracing::info!(team_id, wave_id = wave.id, "wave created");
    Ok(ApiResponse::created(wave))
}

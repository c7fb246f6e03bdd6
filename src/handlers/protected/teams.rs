// Team management: GET /api/teams/:id

use std::collections::HashMap;

use axum::extract::Path;

use crate::database::manager::DatabaseManager;
use crate::database::repository::{TeamRecord, TeamRepository};
use crate::error::ApiError;
use crate::handlers::{params_map, validated};
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::validation::registry::TEAM_ID_PARAMS;

pub async fn team_get(Path(params): Path<HashMap<String, String>>) -> ApiResult<TeamRecord> {
    let payload = validated(TEAM_ID_PARAMS, &params_map(&params))?;
    let id = payload
        .int("id")
        .ok_or_else(|| ApiError::internal_server_error("validated payload missing id"))?;

    let pool = DatabaseManager::pool().await?;
    let team = TeamRepository::get(&pool, id).await?;
    Ok(ApiResponse::success(team))
}

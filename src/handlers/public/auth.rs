// POST /auth/login - validate the admin password and issue a session token.

use axum::response::Json;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::config;
use crate::error::ApiError;
use crate::handlers::{body_map, validated};
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::validation::registry::LOGIN_BODY;

pub async fn login(Json(body): Json<Value>) -> ApiResult<Value> {
    let raw = body_map(&body)?;
    let payload = validated(LOGIN_BODY, &raw)?;

    // Constraint MinLen(1) guarantees presence; unwrap-free access anyway.
    let password = payload
        .str("password")
        .ok_or_else(|| ApiError::internal_server_error("validated payload missing password"))?;

    let expected = &config::config().security.admin_password_sha256;
    if expected.is_empty() {
        tracing::error!("ADMIN_PASSWORD_SHA256 is not configured");
        return Err(ApiError::service_unavailable("Login is not available"));
    }

    if sha256_hex(password) != *expected {
        tracing::info!("admin login rejected: bad credentials");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let claims = Claims::new("admin".to_string(), Uuid::new_v4(), "en".to_string());
    let expires_in = config::config().security.jwt_expiry_hours * 3600;
    let token = generate_jwt(claims)
        .map_err(|e| ApiError::internal_server_error(format!("token generation failed: {e}")))?;

    Ok(ApiResponse::success(json!({
        "token": token,
        "expires_in": expires_in,
    })))
}

fn sha256_hex(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hex_matches_known_vector() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}

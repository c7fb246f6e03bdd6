use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use uuid::Uuid;

use crate::auth::{authorize, Access, Caller, Claims};
use crate::config;
use crate::error::ApiError;
use crate::locale::{catalog, Language};

/// Authenticated admin context extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user: String,
    pub user_id: Uuid,
    pub language: Option<Language>,
}

impl AuthUser {
    pub fn caller(&self) -> Caller {
        Caller {
            identity: Some(self.user_id.to_string()),
            language: self.language,
            authorized: true,
        }
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user: claims.user,
            user_id: claims.user_id,
            language: Language::from_tag(&claims.language),
        }
    }
}

/// JWT authentication middleware for the protected admin API. Runs the
/// authorization gate before any handler (and therefore before payload
/// validation); a denied caller gets the localized denial text.
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // A caller without a decodable token is anonymous; the gate denies it.
    let caller_language = language_from_headers(&headers);

    let auth_user = match extract_jwt_from_headers(&headers).and_then(|token| validate_jwt(&token))
    {
        Ok(claims) => Some(AuthUser::from(claims)),
        Err(reason) => {
            tracing::debug!("JWT rejected: {}", reason);
            None
        }
    };

    let caller = auth_user
        .as_ref()
        .map(AuthUser::caller)
        .unwrap_or_else(|| Caller::anonymous(caller_language));

    if let Access::Denied { reason_key } = authorize(&caller) {
        let text = catalog()
            .resolve(caller.language, reason_key)
            .map_err(|e| ApiError::internal_server_error(e.to_string()))?;
        return Err(ApiError::unauthorized(text));
    }

    if let Some(auth_user) = auth_user {
        request.extensions_mut().insert(auth_user);
    }

    Ok(next.run(request).await)
}

/// Caller language preference from Accept-Language, first tag only.
fn language_from_headers(headers: &HeaderMap) -> Option<Language> {
    headers
        .get("accept-language")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|tag| Language::from_tag(tag.trim()))
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

/// Validate JWT token and extract claims
fn validate_jwt(token: &str) -> Result<Claims, String> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("Invalid JWT token: {}", e))?;

    Ok(token_data.claims)
}

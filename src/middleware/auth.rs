use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::validate_jwt;
use crate::config::SecurityConfig;
use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;

/// Token settings the guard and the `token` command share.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub expiry_hours: u64,
}

impl From<&SecurityConfig> for AuthSettings {
    fn from(security: &SecurityConfig) -> Self {
        Self {
            jwt_secret: security.jwt_secret.clone(),
            expiry_hours: security.jwt_expiry_hours,
        }
    }
}

/// Caller resolved from the bearer token
#[derive(Clone, Debug, Serialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub organisation: Uuid,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            organisation: user.organisation,
        }
    }
}

/// JWT authentication middleware: validates the token, loads its user and
/// injects [`AuthUser`] into the request
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(|msg| {
        warn!("Rejected request to {}: {}", request.uri().path(), msg);
        ApiError::unauthorized(msg)
    })?;

    let claims = validate_jwt(token, &state.auth.jwt_secret).map_err(|e| {
        warn!("Rejected token: {}", e);
        ApiError::unauthorized("Invalid or expired token")
    })?;

    let user = state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| {
            warn!("Token subject {} does not exist", claims.sub);
            ApiError::unauthorized("Unknown user")
        })?;

    debug!("Authenticated user {} in organisation {}", user.id, user.organisation);
    request.extensions_mut().insert(AuthUser::from(user));

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        Some(_) => Err("Empty JWT token"),
        None => Err("Authorization header must use Bearer token format"),
    }
}

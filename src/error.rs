// HTTP API Error Types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::auth::JwtError;
use crate::database::StoreError;
use crate::filter::FilterError;
use crate::mail::MailError;
use crate::report::ReportError;

pub const SERVER_ERROR: &str = "SERVER_ERROR";
pub const PROJECT_NOT_FOUND: &str = "PROJECT_NOT_FOUND";
pub const PROJECT_ALREADY_EXISTS: &str = "PROJECT_ALREADY_EXISTS";
pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
pub const INVALID_BODY: &str = "INVALID_BODY";
pub const INVALID_QUERY: &str = "INVALID_QUERY";

/// Failure envelope: `{ "ok": false, "code": ..., "error"?: ... }`
#[derive(Debug)]
pub enum ApiError {
    // 400
    BadRequest { code: &'static str, message: String },

    // 401
    Unauthorized(String),

    // 404
    NotFound { code: &'static str },

    // 409
    Conflict { code: &'static str },

    // 500; detail is logged, never returned
    ServerError(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest { code, .. } => code,
            ApiError::Unauthorized(_) => UNAUTHORIZED,
            ApiError::NotFound { code } => code,
            ApiError::Conflict { code } => code,
            ApiError::ServerError(_) => SERVER_ERROR,
        }
    }

    /// Client-safe detail, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::BadRequest { message, .. } => Some(message),
            ApiError::Unauthorized(message) => Some(message),
            ApiError::NotFound { .. } | ApiError::Conflict { .. } => None,
            ApiError::ServerError(_) => Some("An error occurred while processing your request"),
        }
    }

    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "ok": false,
            "code": self.error_code(),
        });
        if let Some(message) = self.message() {
            body["error"] = json!(message);
        }
        body
    }
}

impl ApiError {
    pub fn invalid_body(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            code: INVALID_BODY,
            message: message.into(),
        }
    }

    pub fn invalid_query(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            code: INVALID_QUERY,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn project_not_found() -> Self {
        ApiError::NotFound { code: PROJECT_NOT_FOUND }
    }

    pub fn project_already_exists() -> Self {
        ApiError::Conflict {
            code: PROJECT_ALREADY_EXISTS,
        }
    }

    pub fn server_error(detail: impl Into<String>) -> Self {
        ApiError::ServerError(detail.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => ApiError::project_already_exists(),
            StoreError::Database(db_err) => ApiError::server_error(format!("Database error: {}", db_err)),
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::InvalidColumn(column) => ApiError::invalid_query(format!("Unknown column '{}'", column)),
            FilterError::InvalidValue { column, value } => {
                ApiError::invalid_query(format!("Invalid value '{}' for column '{}'", value, column))
            }
            other => ApiError::server_error(format!("Filter error: {}", other)),
        }
    }
}

impl From<MailError> for ApiError {
    fn from(err: MailError) -> Self {
        ApiError::server_error(format!("Mail error: {}", err))
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::ProjectNotFound(_) => ApiError::project_not_found(),
            ReportError::Store(e) => e.into(),
            ReportError::Mail(e) => e.into(),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::InvalidSecret | JwtError::TokenGeneration(_) => {
                ApiError::server_error(format!("JWT error: {}", err))
            }
            JwtError::InvalidToken(_) => ApiError::unauthorized(err.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::ServerError(detail) => write!(f, "{}: {}", SERVER_ERROR, detail),
            other => write!(f, "{}", other.error_code()),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::ServerError(detail) = &self {
            tracing::error!("{}", detail);
        }
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

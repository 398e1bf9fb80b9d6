// handlers/public/health.rs - GET / and GET /health handlers

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use tracing::error;

use crate::state::AppState;

pub async fn root_get() -> Json<Value> {
    Json(json!({
        "ok": true,
        "data": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }
    }))
}

/// Liveness plus a round trip to the project store.
pub async fn health_get(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.projects.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true, "data": { "store": "up" } }))),
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "ok": false, "code": crate::error::SERVER_ERROR, "data": { "store": "down" } })),
            )
        }
    }
}

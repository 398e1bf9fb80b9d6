use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::SecurityConfig;
use crate::handlers::{projects, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

pub fn app(state: AppState, security: &SecurityConfig) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(public::root_get))
        .route("/health", get(public::health_get))
        // Protected
        .nest("/project", project_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match cors_layer(security) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn project_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(projects::project_list).post(projects::project_post))
        .route("/list", get(projects::project_list))
        .route("/search", post(projects::search_post))
        .route(
            "/:id",
            get(projects::project_get)
                .put(projects::project_put)
                .delete(projects::project_delete),
        )
        .route("/:id/send-report", post(projects::send_report_post))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

/// `None` when CORS is disabled; `*` allows any origin.
pub fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }
    if security.cors_origins.iter().any(|o| o == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::database::InMemoryStore;
    use crate::mail::{MailSettings, MemoryMailer};
    use crate::middleware::AuthSettings;

    fn test_app() -> Router {
        let state = AppState::in_memory(
            Arc::new(InMemoryStore::new()),
            Arc::new(MemoryMailer::new()),
            MailSettings::unconfigured(5),
            AuthSettings {
                jwt_secret: "secret".to_string(),
                expiry_hours: 1,
            },
        );
        app(state, &security(true, &["*"]))
    }

    async fn call(uri: &str) -> (StatusCode, Value) {
        let response = test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn public_routes_need_no_token() {
        let (status, body) = call("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn project_routes_are_guarded() {
        for uri in ["/project", "/project/list", "/project/00000000-0000-0000-0000-000000000000"] {
            let (status, body) = call(uri).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
            assert_eq!(body["code"], "UNAUTHORIZED");
        }
    }

    fn security(enable_cors: bool, origins: &[&str]) -> SecurityConfig {
        SecurityConfig {
            jwt_secret: "secret".to_string(),
            jwt_expiry_hours: 1,
            enable_cors,
            cors_origins: origins.iter().map(|o| o.to_string()).collect(),
        }
    }

    #[test]
    fn cors_can_be_disabled() {
        assert!(cors_layer(&security(false, &["*"])).is_none());
        assert!(cors_layer(&security(true, &["*"])).is_some());
        assert!(cors_layer(&security(true, &["http://localhost:5173"])).is_some());
    }
}

#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use uuid::Uuid;

use project_api::auth::{generate_jwt, Claims};
use project_api::config::SecurityConfig;
use project_api::database::models::User;
use project_api::database::InMemoryStore;
use project_api::mail::{MailSettings, Mailer, MemoryMailer};
use project_api::middleware::AuthSettings;
use project_api::AppState;

pub const JWT_SECRET: &str = "integration-test-secret";

pub fn mail_settings() -> MailSettings {
    let mut settings = MailSettings::unconfigured(5);
    settings.relay_url = "http://127.0.0.1:9/send".to_string();
    settings.from_address = "reports@example.com".to_string();
    settings.recipient = "manager@example.com".to_string();
    settings
}

pub fn security() -> SecurityConfig {
    SecurityConfig {
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiry_hours: 1,
        enable_cors: true,
        cors_origins: vec!["*".to_string()],
    }
}

/// An in-process server over the in-memory store, bound to a free port.
pub struct TestServer {
    pub base_url: String,
    pub store: Arc<InMemoryStore>,
    pub mailer: Arc<MemoryMailer>,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        let mailer = Arc::new(MemoryMailer::new());
        let (base_url, store) = spawn_app(mailer.clone(), mail_settings()).await?;
        Ok(Self {
            base_url,
            store,
            mailer,
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Registers a user in `organisation` and returns it with a valid token.
    pub async fn user_in(&self, organisation: Uuid, name: &str) -> (User, String) {
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            organisation,
        };
        self.store.add_user(user.clone()).await;
        let token = token_for(user.id);
        (user, token)
    }

    pub fn get(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.get(self.url(path)).bearer_auth(token)
    }

    pub fn post(&self, path: &str, token: &str, body: &Value) -> RequestBuilder {
        self.client.post(self.url(path)).bearer_auth(token).json(body)
    }

    pub fn put(&self, path: &str, token: &str, body: &Value) -> RequestBuilder {
        self.client.put(self.url(path)).bearer_auth(token).json(body)
    }

    pub fn delete(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.delete(self.url(path)).bearer_auth(token)
    }

    /// Creates a project and returns its JSON representation.
    pub async fn create_project(&self, token: &str, body: Value) -> Result<Value> {
        let (status, body) = send(self.post("/project", token, &body)).await?;
        anyhow::ensure!(status == StatusCode::OK, "create failed: {} {}", status, body);
        Ok(body["data"].clone())
    }
}

pub fn token_for(user_id: Uuid) -> String {
    generate_jwt(&Claims::new(user_id, 1), JWT_SECRET).expect("token")
}

/// Sends a request and decodes the JSON envelope.
pub async fn send(request: RequestBuilder) -> Result<(StatusCode, Value)> {
    let res = request.send().await?;
    let status = res.status();
    let body = res.json::<Value>().await.context("response was not JSON")?;
    Ok((status, body))
}

/// Starts the app with the given mailer and returns its base URL.
pub async fn spawn_app(mailer: Arc<dyn Mailer>, mail: MailSettings) -> Result<(String, Arc<InMemoryStore>)> {
    let store = Arc::new(InMemoryStore::new());
    let state = AppState::in_memory(store.clone(), mailer, mail, auth_settings());
    let base_url = serve(state).await?;
    Ok((base_url, store))
}

pub fn auth_settings() -> AuthSettings {
    AuthSettings {
        jwt_secret: JWT_SECRET.to_string(),
        expiry_hours: 1,
    }
}

/// Serves `state` on a free port and returns the base URL once healthy.
pub async fn serve(state: AppState) -> Result<String> {
    let app = project_api::app(state, &security());

    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let base_url = format!("http://127.0.0.1:{}", port);
    wait_ready(&base_url, Duration::from_secs(5)).await?;
    Ok(base_url)
}

async fn wait_ready(base_url: &str, timeout: Duration) -> Result<()> {
    let client = reqwest::Client::new();
    let deadline = Instant::now() + timeout;
    loop {
        if Instant::now() > deadline {
            break;
        }
        if let Ok(resp) = client.get(format!("{}/health", base_url)).send().await {
            if resp.status() == StatusCode::OK {
                return Ok(());
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    anyhow::bail!("server did not become ready on {} within {:?}", base_url, timeout)
}

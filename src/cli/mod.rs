use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::config::{self, AppConfig};
use crate::database::{DatabaseManager, PostgresStore};
use crate::mail::HttpMailRelay;
use crate::middleware::AuthSettings;
use crate::server;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "project-api")]
#[command(about = "Project API server and maintenance commands")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server")]
    Serve {
        #[arg(long, help = "Port to bind; defaults to the configured port")]
        port: Option<u16>,
    },

    #[command(about = "Mint a bearer token for a user")]
    Token {
        #[arg(long, help = "User id to put in the token subject")]
        user: Uuid,

        #[arg(long, help = "Token lifetime in hours; defaults to the configured expiry")]
        hours: Option<u64>,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::config();
    match cli.command {
        Commands::Serve { port } => serve(config, port).await,
        Commands::Token { user, hours } => {
            let settings = AuthSettings::from(&config.security);
            let claims = Claims::new(user, hours.unwrap_or(settings.expiry_hours));
            let token = generate_jwt(&claims, &settings.jwt_secret).context("failed to mint token")?;
            println!("{}", token);
            Ok(())
        }
    }
}

async fn serve(config: &AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    info!("Starting project-api in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    if config.database.run_migrations {
        DatabaseManager::migrate(&pool).await.context("failed to run migrations")?;
    }

    let mailer = HttpMailRelay::new(&config.mail).context("invalid mail relay settings")?;
    if !config.mail.is_configured() {
        tracing::warn!("MAIL_FROM_ADDRESS or REPORT_RECIPIENT is unset; report delivery will fail");
    }

    let state = AppState::postgres(
        PostgresStore::new(pool),
        Arc::new(mailer),
        config.mail.clone(),
        AuthSettings::from(&config.security),
    );
    let app = server::app(state, &config.security);

    let bind_addr = format!("0.0.0.0:{}", port.unwrap_or(config.server.port));
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("project-api listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

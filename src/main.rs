//! Account Service Server
//!
//! HTTP server exposing registration, login and profile lookups. Reads its
//! configuration from the environment (and `.env` when present).

use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use account_service::{
    api::{AppState, RouterBuilder},
    config::AppConfig,
    database::{ensure_schema, ConnectionProvider},
    service::{EmailService, LogNotifier, RegistrationNotifier, UserService},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    dotenv().ok();

    let config = AppConfig::from_env().context("failed to load configuration")?;

    // RUST_LOG, when set, overrides LOG_LEVEL
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.server.log_level.as_str()),
    )
    .init();

    log::info!("Starting Account Service v{}", account_service::VERSION);

    config.validate().context("invalid configuration")?;

    log::info!("Configuration loaded: {:?}", config.database);

    let provider = ConnectionProvider::connect(config.database.clone())
        .await
        .context("failed to connect to the database")?;
    ensure_schema(&provider)
        .await
        .context("failed to prepare the database schema")?;

    let notifier: Arc<dyn RegistrationNotifier> = match config.email.clone() {
        Some(email_config) => {
            let service = EmailService::new(email_config)?;
            log::info!("Email notifications enabled");
            Arc::new(service)
        }
        None => {
            log::warn!("SMTP not configured, registration emails will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let user_service = Arc::new(UserService::with_notifier(provider.clone(), notifier));
    let app_state = AppState { user_service };

    let app = RouterBuilder::with_all_routes()
        .build()
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .into_inner(),
        );

    let bind_addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    log::info!("Listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    provider.close().await;
    log::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}

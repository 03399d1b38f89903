//! Application bootstrapper
//!
//! Handles all initialization and setup for the hackmate backend.

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue, Method};
use axum::{middleware, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, LogFormat};
use crate::db;
use crate::endpoints;
use crate::middleware::security_headers;
use crate::services::users;
use crate::state::AppState;

/// Bootstrap and run the application
pub async fn run() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing(&config);

    tracing::info!("Starting hackmate backend v{}", config.version);
    if config.auth.uses_dev_secret() {
        tracing::warn!("HACKMATE_SECRET_KEY is not set, using the development signing secret");
    }
    if !config.telegram.is_configured() {
        tracing::warn!(
            "No Telegram bot token configured; bot endpoints and signature checks are disabled"
        );
    }

    let state = init_state(config).await?;
    let addr = bind_address(&state.config)?;
    let app = create_app(state);

    serve(app, addr).await
}

/// Initialize tracing/logging
fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("hackmate={},tower_http=info", config.log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_ansi(false))
            .init(),
    }
}

/// Connect the database (running migrations) and seed the bootstrap admin
async fn init_state(config: Config) -> anyhow::Result<AppState> {
    let conn = db::connect(&config).await?;
    tracing::info!("Database connection established");

    if let (Some(email), Some(password)) = (
        config.auth.admin_email.as_deref(),
        config.auth.admin_password.as_deref(),
    ) {
        if users::seed_admin(&conn, email, password).await? {
            tracing::info!(email, "Created admin account");
        }
    }

    Ok(AppState::new(conn, config))
}

/// Create the main application router with the HTTP middleware stack
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.allowed_origins);

    endpoints::create_router(state)
        .layer(middleware::from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            HeaderName::from_static("authorization"),
            HeaderName::from_static("content-type"),
            HeaderName::from_static("x-bot-token"),
        ])
        .allow_credentials(true)
}

fn bind_address(config: &Config) -> anyhow::Result<SocketAddr> {
    let addr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    Ok(addr)
}

/// Start the HTTP server
async fn serve(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

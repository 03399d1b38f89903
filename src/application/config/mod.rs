pub mod auth;
pub mod database;
pub mod server;
pub mod telegram;

use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server: server::ServerConfig,
    pub database: database::DatabaseConfig,
    pub auth: auth::AuthConfig,
    pub telegram: telegram::TelegramConfig,

    // Build info
    pub version: String,

    // Logging
    pub log_level: String,
    pub log_format: LogFormat,
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl Config {
    /// Build the configuration from the process environment.
    ///
    /// A `.env` file in the working directory is honoured if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self {
            server: server::ServerConfig::from_env(),
            database: database::DatabaseConfig::from_env(),
            auth: auth::AuthConfig::from_env(),
            telegram: telegram::TelegramConfig::from_env(),

            version: env!("CARGO_PKG_VERSION").to_string(),

            log_level: env::var("HACKMATE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format: match env::var("HACKMATE_LOG_FORMAT")
                .map(|v| v.to_lowercase())
                .as_deref()
            {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
        }
    }

    /// Configuration for tests: in-memory SQLite, fixed secret, no Telegram checks
    pub fn for_tests() -> Self {
        Self {
            server: server::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                allowed_origins: Vec::new(),
            },
            database: database::DatabaseConfig {
                database_url: "sqlite::memory:".to_string(),
            },
            auth: auth::AuthConfig {
                secret_key: "test-secret-key".to_string(),
                access_token_expire_minutes: 60,
                admin_email: None,
                admin_password: None,
                code_expiry_minutes: 10,
            },
            telegram: telegram::TelegramConfig {
                bot_token: "test-bot-token".to_string(),
                verify_signature: false,
                init_data_max_age_secs: 86_400,
            },
            version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "debug".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

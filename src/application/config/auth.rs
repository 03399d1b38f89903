use std::env;

/// Fallback signing secret for local development
pub const DEV_SECRET_KEY: &str = "hackmate-dev-secret";

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret for access tokens
    pub secret_key: String,
    pub access_token_expire_minutes: i64,
    /// Bootstrap admin account, created at startup when both are set
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    /// Lifetime of one-time login codes issued through the bot
    pub code_expiry_minutes: i64,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            secret_key: env::var("HACKMATE_SECRET_KEY")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEV_SECRET_KEY.to_string()),
            access_token_expire_minutes: env::var("HACKMATE_ACCESS_TOKEN_EXPIRE_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1440),
            admin_email: env::var("HACKMATE_ADMIN_EMAIL").ok().filter(|v| !v.is_empty()),
            admin_password: env::var("HACKMATE_ADMIN_PASSWORD")
                .ok()
                .filter(|v| !v.is_empty()),
            code_expiry_minutes: env::var("HACKMATE_CODE_EXPIRY_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.secret_key == DEV_SECRET_KEY
    }
}

use std::env;

use chrono::Duration;

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Require a valid `init_data` signature on Telegram logins
    pub verify_signature: bool,
    /// Oldest `auth_date` accepted in signed `init_data`
    pub init_data_max_age_secs: i64,
}

impl TelegramConfig {
    pub fn from_env() -> Self {
        let bot_token = env::var("HACKMATE_TELEGRAM_BOT_TOKEN").unwrap_or_default();

        Self {
            verify_signature: env::var("HACKMATE_TELEGRAM_VERIFY_SIGNATURE")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(!bot_token.is_empty()),
            init_data_max_age_secs: env::var("HACKMATE_TELEGRAM_INIT_DATA_MAX_AGE_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(86_400),
            bot_token,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.bot_token.is_empty()
    }

    pub fn init_data_max_age(&self) -> Duration {
        Duration::seconds(self.init_data_max_age_secs)
    }
}

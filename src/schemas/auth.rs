use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login through a Telegram account.
///
/// `init_data` is the raw signed query string handed to the client by
/// Telegram. When signature verification is enabled it is required and
/// the account is taken from its `user` field, not from the other fields.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramAuthRequest {
    pub telegram_id: i64,
    pub telegram_username: Option<String>,
    pub full_name: String,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub init_data: Option<String>,
}

/// Sent by the bot to obtain a one-time login code for a Telegram account
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCodeRequest {
    pub telegram_id: i64,
    pub telegram_username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCodeResponse {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyCodeRequest {
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user_id: i64,
}

impl TokenResponse {
    pub fn bearer(access_token: String, user_id: i64) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            user_id,
        }
    }
}

//! Telegram login: signed `init_data` checks and bot-issued one-time codes

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use rand::Rng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::auth::AuthConfig;
use crate::db::conflict_on_unique;
use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::{auth_code, user};
use crate::services::users::{self, TelegramIdentity};
use crate::state::DbConn;

type HmacSha256 = Hmac<Sha256>;

const CODE_ATTEMPTS: usize = 5;

/// Build the data-check-string: every `key=value` pair except `hash`,
/// URL-decoded and sorted by key, joined with newlines
fn data_check_string(pairs: &[(String, String)]) -> String {
    let mut fields: Vec<String> = pairs
        .iter()
        .filter(|(k, _)| k != "hash")
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();
    fields.sort();
    fields.join("\n")
}

fn parse_init_data(init_data: &str) -> Option<Vec<(String, String)>> {
    init_data
        .split('&')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (key, value) = part.split_once('=')?;
            let value = urlencoding::decode(value).ok()?;
            Some((key.to_string(), value.into_owned()))
        })
        .collect()
}

/// Check the `hash` field of a Telegram `init_data` string.
///
/// The key is SHA256(bot_token) and the MAC is HMAC-SHA256 over the
/// data-check-string, hex encoded.
pub fn verify_init_data(bot_token: &str, init_data: &str) -> bool {
    parse_init_data(init_data).is_some_and(|pairs| has_valid_hash(bot_token, &pairs))
}

fn has_valid_hash(bot_token: &str, pairs: &[(String, String)]) -> bool {
    let Some((_, hash)) = pairs.iter().find(|(k, _)| k == "hash") else {
        return false;
    };
    let Ok(expected) = hex::decode(hash) else {
        return false;
    };

    let secret = Sha256::digest(bot_token.as_bytes());
    let Ok(mut mac) = HmacSha256::new_from_slice(&secret) else {
        return false;
    };
    mac.update(data_check_string(pairs).as_bytes());
    mac.verify_slice(&expected).is_ok()
}

/// The `user` field of `init_data`
#[derive(Debug, Deserialize)]
struct InitDataUser {
    id: i64,
    username: Option<String>,
    #[serde(default)]
    first_name: String,
    last_name: Option<String>,
    photo_url: Option<String>,
}

impl From<InitDataUser> for TelegramIdentity {
    fn from(user: InitDataUser) -> Self {
        let full_name = match user.last_name.as_deref() {
            Some(last) if !last.trim().is_empty() => format!("{} {}", user.first_name, last),
            _ => user.first_name,
        };
        let full_name = match full_name.trim() {
            "" => user
                .username
                .clone()
                .unwrap_or_else(|| format!("User_{}", user.id)),
            name => name.to_string(),
        };

        Self {
            telegram_id: user.id,
            telegram_username: user.username,
            full_name,
            avatar_url: user.photo_url,
        }
    }
}

/// Verify a Telegram `init_data` string and return the account it was
/// signed for.
///
/// `auth_date` must be present and at most `max_age` old at `now`.
pub fn verified_identity(
    bot_token: &str,
    init_data: &str,
    max_age: Duration,
    now: DateTime<Utc>,
) -> Result<TelegramIdentity> {
    let pairs = parse_init_data(init_data)
        .filter(|pairs| has_valid_hash(bot_token, pairs))
        .ok_or_else(|| AppError::Unauthorized("Invalid Telegram signature".to_string()))?;
    let field = |name: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    };

    let auth_date = field("auth_date")
        .and_then(|v| v.parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| AppError::Unauthorized("Telegram init data has no auth date".to_string()))?;
    if now - auth_date > max_age {
        return Err(AppError::Unauthorized(
            "Telegram init data has expired".to_string(),
        ));
    }

    let user: InitDataUser = field("user")
        .and_then(|raw| serde_json::from_str(raw).ok())
        .ok_or_else(|| AppError::Unauthorized("Telegram init data has no user".to_string()))?;

    Ok(user.into())
}

/// Six random digits
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    format!("{:06}", rng.random_range(0..1_000_000u32))
}

/// Issue a one-time login code for a Telegram account
pub async fn issue_login_code(
    db: &DbConn,
    auth: &AuthConfig,
    telegram_id: i64,
    telegram_username: Option<String>,
) -> Result<auth_code::Model> {
    let now = Utc::now();
    let expires_at = now + Duration::minutes(auth.code_expiry_minutes);

    for _ in 0..CODE_ATTEMPTS {
        let code = generate_code();
        let taken = AuthCode::find()
            .filter(auth_code::Column::Code.eq(code.as_str()))
            .one(db)
            .await?
            .is_some();
        if taken {
            continue;
        }

        let inserted = auth_code::ActiveModel {
            code: Set(code),
            telegram_id: Set(telegram_id),
            telegram_username: Set(telegram_username.clone()),
            expires_at: Set(expires_at),
            is_used: Set(false),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await;

        match inserted.map_err(|e| conflict_on_unique(e, "Code already issued")) {
            Ok(model) => {
                tracing::debug!(telegram_id, "Issued login code");
                return Ok(model);
            }
            Err(AppError::Conflict(_)) => continue,
            Err(e) => return Err(e),
        }
    }

    Err(AppError::Internal(
        "Could not allocate a unique login code".to_string(),
    ))
}

/// Exchange a login code for its user, creating the user on first login.
/// A code works once and only before it expires.
pub async fn redeem_login_code(db: &DbConn, code: &str) -> Result<user::Model> {
    let txn = db.begin().await?;

    let found = AuthCode::find()
        .filter(auth_code::Column::Code.eq(code))
        .one(&txn)
        .await?
        .filter(|c| c.is_valid(Utc::now()))
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired code".to_string()))?;

    let telegram_id = found.telegram_id;
    let username = found.telegram_username.clone();

    let mut active: auth_code::ActiveModel = found.into();
    active.is_used = Set(true);
    active.update(&txn).await?;

    let user = match users::find_by_telegram_id(&txn, telegram_id).await? {
        Some(existing) => existing,
        None => {
            let full_name = username
                .clone()
                .unwrap_or_else(|| format!("User_{}", telegram_id));
            users::upsert_telegram_user(
                &txn,
                TelegramIdentity {
                    telegram_id,
                    telegram_username: username,
                    full_name,
                    avatar_url: None,
                },
            )
            .await?
        }
    };

    txn.commit().await?;
    Ok(user)
}

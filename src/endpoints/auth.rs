//! Login endpoints: Telegram, bot-issued one-time codes, and admin password

use axum::{
    extract::State,
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use chrono::Utc;

use crate::error::{AppError, Result};
use crate::schemas::{
    AdminLoginRequest, LoginCodeRequest, LoginCodeResponse, TelegramAuthRequest, TokenResponse,
    VerifyCodeRequest,
};
use crate::services::security::create_access_token;
use crate::services::users::{self, TelegramIdentity};
use crate::services::telegram;
use crate::state::AppState;

/// Header the bot uses to authenticate itself
pub const BOT_TOKEN_HEADER: &str = "x-bot-token";

/// Create auth routes
pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/telegram", post(telegram_login))
        .route("/telegram/code", post(issue_code))
        .route("/code/verify", post(verify_code))
        .route("/admin/login", post(admin_login))
        .with_state(state)
}

/// Log in (or sign up) with a Telegram identity.
///
/// With signature verification on, the account comes from the signed
/// `init_data` and the identity fields in the body are ignored.
async fn telegram_login(
    State(state): State<AppState>,
    Json(req): Json<TelegramAuthRequest>,
) -> Result<Json<TokenResponse>> {
    let tg = &state.config.telegram;
    let identity = if tg.is_configured() && tg.verify_signature {
        let init_data = req
            .init_data
            .as_deref()
            .ok_or_else(|| AppError::Unauthorized("Missing Telegram init data".to_string()))?;
        telegram::verified_identity(&tg.bot_token, init_data, tg.init_data_max_age(), Utc::now())
            .inspect_err(|e| tracing::warn!(error = %e, "Rejected Telegram login"))?
    } else {
        TelegramIdentity {
            telegram_id: req.telegram_id,
            telegram_username: req.telegram_username,
            full_name: req.full_name,
            avatar_url: req.avatar_url,
        }
    };

    let user = users::upsert_telegram_user(&state.db, identity).await?;

    let token = create_access_token(&state.config.auth, user.id, false)?;
    tracing::info!(user_id = user.id, "User logged in via Telegram");

    Ok(Json(TokenResponse::bearer(token, user.id)))
}

/// Bot-only: issue a one-time login code for a Telegram account
async fn issue_code(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginCodeRequest>,
) -> Result<Json<LoginCodeResponse>> {
    let tg = &state.config.telegram;
    let presented = headers
        .get(BOT_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !tg.is_configured() || presented != tg.bot_token {
        return Err(AppError::Unauthorized("Invalid bot token".to_string()));
    }

    let issued = telegram::issue_login_code(
        &state.db,
        &state.config.auth,
        req.telegram_id,
        req.telegram_username,
    )
    .await?;

    Ok(Json(LoginCodeResponse {
        code: issued.code,
        expires_at: issued.expires_at,
    }))
}

/// Exchange a one-time code for an access token
async fn verify_code(
    State(state): State<AppState>,
    Json(req): Json<VerifyCodeRequest>,
) -> Result<Json<TokenResponse>> {
    let user = telegram::redeem_login_code(&state.db, req.code.trim()).await?;
    let token = create_access_token(&state.config.auth, user.id, false)?;
    tracing::info!(user_id = user.id, "User logged in via login code");

    Ok(Json(TokenResponse::bearer(token, user.id)))
}

/// Admin login by email and password
async fn admin_login(
    State(state): State<AppState>,
    Json(req): Json<AdminLoginRequest>,
) -> Result<Json<TokenResponse>> {
    let admin = users::authenticate_admin(&state.db, &req.email, &req.password).await?;
    let token = create_access_token(&state.config.auth, admin.id, true)?;
    tracing::info!(admin_id = admin.id, "Admin logged in");

    Ok(Json(TokenResponse::bearer(token, admin.id)))
}

//! Bearer-token authentication middleware
//!
//! Participant routes and admin routes each get their own layer; the
//! authenticated account is stored in request extensions for handlers.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::models::{admin, user};
use crate::services::security::{decode_token, Claims};
use crate::services::users;
use crate::state::AppState;

/// Authenticated participant stored in request extensions
#[derive(Clone)]
pub struct AuthenticatedUser(pub user::Model);

/// Authenticated admin stored in request extensions
#[derive(Clone)]
pub struct AuthenticatedAdmin(pub admin::Model);

/// Require a valid participant token
///
/// Returns 401 Unauthorized if the token is missing, invalid, belongs to an
/// admin, or names a user that no longer exists.
pub async fn require_user(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let claims = match claims_from_request(&state, &req) {
        Ok(c) => c,
        Err(e) => return e.into_response(),
    };
    if claims.is_admin {
        return AppError::Unauthorized("Invalid token or insufficient permissions".to_string())
            .into_response();
    }

    let user = match load_user(&state, &claims).await {
        Ok(u) => u,
        Err(e) => return e.into_response(),
    };

    req.extensions_mut().insert(AuthenticatedUser(user));
    next.run(req).await
}

/// Require a valid admin token
///
/// Returns 401 when the token is missing or invalid and 403 when it is a
/// participant token.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let claims = match claims_from_request(&state, &req) {
        Ok(c) => c,
        Err(e) => return e.into_response(),
    };
    if !claims.is_admin {
        return AppError::Forbidden("Admin access required".to_string()).into_response();
    }

    let admin = match load_admin(&state, &claims).await {
        Ok(a) => a,
        Err(e) => return e.into_response(),
    };

    req.extensions_mut().insert(AuthenticatedAdmin(admin));
    next.run(req).await
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(req: &Request) -> Option<&str> {
    let auth_header = req.headers().get(AUTHORIZATION)?;
    let auth_str = auth_header.to_str().ok()?;
    auth_str.strip_prefix("Bearer ")
}

fn claims_from_request(state: &AppState, req: &Request) -> Result<Claims, AppError> {
    let token = extract_bearer_token(req).ok_or_else(|| {
        AppError::Unauthorized("Missing or invalid Authorization header".to_string())
    })?;
    decode_token(&state.config.auth, token)
}

async fn load_user(state: &AppState, claims: &Claims) -> Result<user::Model, AppError> {
    let user_id = claims.subject_id()?;
    users::get_user(&state.db, user_id)
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::Unauthorized("User not found".to_string()),
            other => other,
        })
}

async fn load_admin(state: &AppState, claims: &Claims) -> Result<admin::Model, AppError> {
    let admin_id = claims.subject_id()?;
    users::get_admin(&state.db, admin_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Admin not found".to_string()))
}

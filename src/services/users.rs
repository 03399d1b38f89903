//! Identity store: participants (keyed by Telegram id) and admins

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::user::{encode_skills, EXPERIENCE_LEVELS};
use crate::models::{admin, registration, user};
use crate::schemas::UpdateProfileRequest;
use crate::services::security::{hash_password, verify_password};
use crate::state::DbConn;

/// Identity facts supplied by Telegram at login
#[derive(Debug, Clone)]
pub struct TelegramIdentity {
    pub telegram_id: i64,
    pub telegram_username: Option<String>,
    pub full_name: String,
    pub avatar_url: Option<String>,
}

pub async fn get_user<C: ConnectionTrait>(conn: &C, user_id: i64) -> Result<user::Model> {
    User::find_by_id(user_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub async fn find_by_telegram_id<C: ConnectionTrait>(
    conn: &C,
    telegram_id: i64,
) -> Result<Option<user::Model>> {
    Ok(User::find()
        .filter(user::Column::TelegramId.eq(telegram_id))
        .one(conn)
        .await?)
}

/// Find the user for a Telegram account, refreshing username and avatar,
/// or create it on first login
pub async fn upsert_telegram_user<C: ConnectionTrait>(
    conn: &C,
    identity: TelegramIdentity,
) -> Result<user::Model> {
    let now = Utc::now();

    if let Some(existing) = find_by_telegram_id(conn, identity.telegram_id).await? {
        let mut active: user::ActiveModel = existing.into();
        active.telegram_username = Set(identity.telegram_username);
        active.avatar_url = Set(identity.avatar_url);
        active.updated_at = Set(now);
        return Ok(active.update(conn).await?);
    }

    let created = user::ActiveModel {
        telegram_id: Set(identity.telegram_id),
        telegram_username: Set(identity.telegram_username),
        full_name: Set(identity.full_name),
        bio: Set(None),
        skills: Set("[]".to_string()),
        role_preference: Set(None),
        experience_level: Set("junior".to_string()),
        avatar_url: Set(identity.avatar_url),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    tracing::info!(user_id = created.id, telegram_id = created.telegram_id, "Registered new user");
    Ok(created)
}

/// Apply a partial profile update
pub async fn update_profile(
    db: &DbConn,
    current: user::Model,
    changes: UpdateProfileRequest,
) -> Result<user::Model> {
    if let Some(level) = changes.experience_level.as_deref() {
        if !EXPERIENCE_LEVELS.contains(&level) {
            return Err(AppError::BadRequest(format!(
                "experience_level must be one of: {}",
                EXPERIENCE_LEVELS.join(", ")
            )));
        }
    }

    let mut active: user::ActiveModel = current.into();
    if let Some(full_name) = changes.full_name.filter(|n| !n.trim().is_empty()) {
        active.full_name = Set(full_name);
    }
    if let Some(bio) = changes.bio {
        active.bio = Set(Some(bio));
    }
    if let Some(skills) = changes.skills {
        active.skills = Set(encode_skills(&skills));
    }
    if let Some(role) = changes.role_preference.filter(|r| !r.is_empty()) {
        active.role_preference = Set(Some(role));
    }
    if let Some(level) = changes.experience_level {
        active.experience_level = Set(level);
    }
    if let Some(avatar) = changes.avatar_url.filter(|a| !a.is_empty()) {
        active.avatar_url = Set(Some(avatar));
    }
    active.updated_at = Set(Utc::now());

    Ok(active.update(db).await?)
}

/// Participants of a hackathon other than `exclude_user_id`
pub async fn list_participants(
    db: &DbConn,
    hackathon_id: i64,
    exclude_user_id: i64,
    skip: u64,
    limit: u64,
) -> Result<Vec<user::Model>> {
    let user_ids: Vec<i64> = Registration::find()
        .filter(registration::Column::HackathonId.eq(hackathon_id))
        .filter(registration::Column::UserId.ne(exclude_user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.user_id)
        .collect();

    if user_ids.is_empty() {
        return Ok(Vec::new());
    }

    Ok(User::find()
        .filter(user::Column::Id.is_in(user_ids))
        .order_by_asc(user::Column::Id)
        .offset(skip)
        .limit(limit)
        .all(db)
        .await?)
}

pub async fn get_admin(db: &DbConn, admin_id: i64) -> Result<Option<admin::Model>> {
    Ok(Admin::find_by_id(admin_id).one(db).await?)
}

/// Check admin credentials; unknown email and wrong password look the same
pub async fn authenticate_admin(db: &DbConn, email: &str, password: &str) -> Result<admin::Model> {
    let found = Admin::find()
        .filter(admin::Column::Email.eq(email))
        .one(db)
        .await?;

    match found {
        Some(admin) if verify_password(password, &admin.hashed_password) => Ok(admin),
        _ => Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        )),
    }
}

/// Create the admin account if no admin with that email exists yet.
///
/// Returns `true` when an account was created.
pub async fn seed_admin(db: &DbConn, email: &str, password: &str) -> Result<bool> {
    let existing = Admin::find()
        .filter(admin::Column::Email.eq(email))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(false);
    }

    admin::ActiveModel {
        email: Set(email.to_string()),
        hashed_password: Set(hash_password(password)?),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(true)
}

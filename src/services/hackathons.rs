//! Hackathon registry and the user <-> hackathon registration join

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::db::conflict_on_unique;
use crate::error::{AppError, Result};
use crate::models::hackathon::{self, HackathonStatus};
use crate::models::prelude::*;
use crate::models::registration;
use crate::schemas::{CreateHackathonRequest, UpdateHackathonRequest};
use crate::state::DbConn;

pub async fn get_hackathon<C: ConnectionTrait>(
    conn: &C,
    hackathon_id: i64,
) -> Result<hackathon::Model> {
    Hackathon::find_by_id(hackathon_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Hackathon not found".to_string()))
}

pub async fn list_hackathons(db: &DbConn, skip: u64, limit: u64) -> Result<Vec<hackathon::Model>> {
    Ok(Hackathon::find()
        .order_by_asc(hackathon::Column::StartDate)
        .order_by_asc(hackathon::Column::Id)
        .offset(skip)
        .limit(limit)
        .all(db)
        .await?)
}

/// Every hackathon, newest first (admin view)
pub async fn list_all_hackathons(db: &DbConn) -> Result<Vec<hackathon::Model>> {
    Ok(Hackathon::find()
        .order_by_desc(hackathon::Column::CreatedAt)
        .order_by_desc(hackathon::Column::Id)
        .all(db)
        .await?)
}

pub async fn get_registration<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    hackathon_id: i64,
) -> Result<Option<registration::Model>> {
    Ok(Registration::find()
        .filter(registration::Column::UserId.eq(user_id))
        .filter(registration::Column::HackathonId.eq(hackathon_id))
        .one(conn)
        .await?)
}

/// Point the user's registration at `team_id` (or clear it), registering
/// the user first if they never did
pub async fn set_registration_team<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    hackathon_id: i64,
    team_id: Option<i64>,
) -> Result<registration::Model> {
    match get_registration(conn, user_id, hackathon_id).await? {
        Some(existing) => {
            let mut active: registration::ActiveModel = existing.into();
            active.team_id = Set(team_id);
            Ok(active.update(conn).await?)
        }
        None => Ok(registration::ActiveModel {
            user_id: Set(user_id),
            hackathon_id: Set(hackathon_id),
            team_id: Set(team_id),
            registered_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(conn)
        .await?),
    }
}

pub async fn register(db: &DbConn, user_id: i64, hackathon_id: i64) -> Result<registration::Model> {
    get_hackathon(db, hackathon_id).await?;

    if get_registration(db, user_id, hackathon_id).await?.is_some() {
        return Err(AppError::Conflict(
            "Already registered for this hackathon".to_string(),
        ));
    }

    let created = registration::ActiveModel {
        user_id: Set(user_id),
        hackathon_id: Set(hackathon_id),
        team_id: Set(None),
        registered_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| conflict_on_unique(e, "Already registered for this hackathon"))?;

    tracing::info!(user_id, hackathon_id, "User registered for hackathon");
    Ok(created)
}

fn validate_window(
    start: chrono::DateTime<Utc>,
    end: chrono::DateTime<Utc>,
    max_team_size: i32,
) -> Result<()> {
    if max_team_size < 1 {
        return Err(AppError::BadRequest(
            "max_team_size must be at least 1".to_string(),
        ));
    }
    if end < start {
        return Err(AppError::BadRequest(
            "end_date must not be before start_date".to_string(),
        ));
    }
    Ok(())
}

pub async fn create_hackathon(
    db: &DbConn,
    req: CreateHackathonRequest,
) -> Result<hackathon::Model> {
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("Hackathon name is required".to_string()));
    }
    validate_window(req.start_date, req.end_date, req.max_team_size)?;

    let exists = Hackathon::find()
        .filter(hackathon::Column::Name.eq(name.as_str()))
        .one(db)
        .await?
        .is_some();
    if exists {
        return Err(AppError::Conflict(
            "Hackathon with this name already exists".to_string(),
        ));
    }

    let now = Utc::now();
    let created = hackathon::ActiveModel {
        name: Set(name),
        description: Set(req.description),
        start_date: Set(req.start_date),
        end_date: Set(req.end_date),
        status: Set(HackathonStatus::Upcoming),
        max_team_size: Set(req.max_team_size),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| conflict_on_unique(e, "Hackathon with this name already exists"))?;

    tracing::info!(hackathon_id = created.id, name = %created.name, "Hackathon created");
    Ok(created)
}

pub async fn update_hackathon(
    db: &DbConn,
    hackathon_id: i64,
    req: UpdateHackathonRequest,
) -> Result<hackathon::Model> {
    let current = get_hackathon(db, hackathon_id).await?;

    let start = req.start_date.unwrap_or(current.start_date);
    let end = req.end_date.unwrap_or(current.end_date);
    let max_team_size = req.max_team_size.unwrap_or(current.max_team_size);
    validate_window(start, end, max_team_size)?;

    let mut active: hackathon::ActiveModel = current.into();
    if let Some(name) = req.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
        active.name = Set(name);
    }
    if let Some(description) = req.description {
        active.description = Set(Some(description));
    }
    if let Some(status) = req.status {
        active.status = Set(status);
    }
    active.start_date = Set(start);
    active.end_date = Set(end);
    active.max_team_size = Set(max_team_size);
    active.updated_at = Set(Utc::now());

    Ok(active
        .update(db)
        .await
        .map_err(|e| conflict_on_unique(e, "Hackathon with this name already exists"))?)
}

//! Team store

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::db::{self, conflict_on_unique};
use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::team::{self, TeamStatus};
use crate::models::team_member::{self, MemberStatus};
use crate::models::{registration, user};
use crate::schemas::{CreateTeamRequest, MyTeamItem, UpdateTeamRequest};
use crate::services::{hackathons, membership};
use crate::state::DbConn;

pub async fn get_team<C: ConnectionTrait>(conn: &C, team_id: i64) -> Result<team::Model> {
    Team::find_by_id(team_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Team not found".to_string()))
}

pub async fn is_captain<C: ConnectionTrait>(conn: &C, team_id: i64, user_id: i64) -> Result<bool> {
    Ok(get_team(conn, team_id).await?.is_captain(user_id))
}

/// Active members of a team in join order
pub async fn list_members<C: ConnectionTrait>(conn: &C, team_id: i64) -> Result<Vec<user::Model>> {
    let rows = TeamMember::find()
        .filter(team_member::Column::TeamId.eq(team_id))
        .filter(team_member::Column::Status.eq(MemberStatus::Active))
        .order_by_asc(team_member::Column::JoinedAt)
        .order_by_asc(team_member::Column::Id)
        .find_also_related(User)
        .all(conn)
        .await?;

    Ok(rows.into_iter().filter_map(|(_, user)| user).collect())
}

/// Create a team with the actor as captain and first member
pub async fn create_team(
    db: &DbConn,
    actor_id: i64,
    req: CreateTeamRequest,
) -> Result<team::Model> {
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("Team name is required".to_string()));
    }

    db::with_retry(|| {
        create_team_once(db, actor_id, req.hackathon_id, &name, &req.description)
    })
    .await
}

async fn create_team_once(
    db: &DbConn,
    actor_id: i64,
    hackathon_id: i64,
    name: &str,
    description: &Option<String>,
) -> Result<team::Model> {
    let txn = db::begin(db).await?;

    hackathons::get_hackathon(&txn, hackathon_id).await?;
    let registration = hackathons::get_registration(&txn, actor_id, hackathon_id)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest("You must register for the hackathon first".to_string())
        })?;
    if registration.team_id.is_some() {
        return Err(AppError::Conflict(
            "You are already in a team for this hackathon".to_string(),
        ));
    }

    let now = Utc::now();
    let team = team::ActiveModel {
        hackathon_id: Set(hackathon_id),
        name: Set(name.to_string()),
        description: Set(description.clone()),
        captain_id: Set(actor_id),
        status: Set(TeamStatus::Open),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| conflict_on_unique(e, "You already captain a team in this hackathon"))?;

    membership::join_team(&txn, &team, actor_id).await?;

    txn.commit().await?;
    tracing::info!(team_id = team.id, hackathon_id, captain_id = actor_id, "Team created");
    Ok(team)
}

/// Teams the user currently belongs to, one per hackathon
pub async fn list_my_teams(db: &DbConn, user_id: i64) -> Result<Vec<MyTeamItem>> {
    let team_ids: Vec<i64> = Registration::find()
        .filter(registration::Column::UserId.eq(user_id))
        .filter(registration::Column::TeamId.is_not_null())
        .all(db)
        .await?
        .into_iter()
        .filter_map(|r| r.team_id)
        .collect();

    if team_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = Team::find()
        .filter(team::Column::Id.is_in(team_ids))
        .order_by_desc(team::Column::CreatedAt)
        .find_also_related(Hackathon)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(team, hackathon)| MyTeamItem {
            id: team.id,
            name: team.name,
            description: team.description,
            hackathon_id: team.hackathon_id,
            hackathon_name: hackathon.map(|h| h.name).unwrap_or_default(),
            status: team.status,
        })
        .collect())
}

/// Teams of a hackathon with the given status, each with its active members
pub async fn list_by_hackathon(
    db: &DbConn,
    hackathon_id: i64,
    status: TeamStatus,
) -> Result<Vec<(team::Model, Vec<user::Model>)>> {
    with_members(db, hackathon_id, Some(status)).await
}

/// Every team of a hackathon regardless of status, with active members
pub async fn list_all_with_members(
    db: &DbConn,
    hackathon_id: i64,
) -> Result<Vec<(team::Model, Vec<user::Model>)>> {
    with_members(db, hackathon_id, None).await
}

async fn with_members(
    db: &DbConn,
    hackathon_id: i64,
    status: Option<TeamStatus>,
) -> Result<Vec<(team::Model, Vec<user::Model>)>> {
    let mut query = Team::find().filter(team::Column::HackathonId.eq(hackathon_id));
    if let Some(status) = status {
        query = query.filter(team::Column::Status.eq(status));
    }
    let teams = query.order_by_asc(team::Column::Id).all(db).await?;

    if teams.is_empty() {
        return Ok(Vec::new());
    }

    let team_ids: Vec<i64> = teams.iter().map(|t| t.id).collect();
    let rows = TeamMember::find()
        .filter(team_member::Column::TeamId.is_in(team_ids))
        .filter(team_member::Column::Status.eq(MemberStatus::Active))
        .order_by_asc(team_member::Column::JoinedAt)
        .order_by_asc(team_member::Column::Id)
        .find_also_related(User)
        .all(db)
        .await?;

    let mut by_team: HashMap<i64, Vec<user::Model>> = HashMap::new();
    for (member, user) in rows {
        if let Some(user) = user {
            by_team.entry(member.team_id).or_default().push(user);
        }
    }

    Ok(teams
        .into_iter()
        .map(|t| {
            let members = by_team.remove(&t.id).unwrap_or_default();
            (t, members)
        })
        .collect())
}

/// Captain-only edit of name, description and status
pub async fn update_team(
    db: &DbConn,
    team_id: i64,
    actor_id: i64,
    req: UpdateTeamRequest,
) -> Result<team::Model> {
    let team = get_team(db, team_id).await?;
    if !team.is_captain(actor_id) {
        return Err(AppError::Forbidden(
            "Only team captain can update the team".to_string(),
        ));
    }

    let mut active: team::ActiveModel = team.into();
    if let Some(name) = req.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
        active.name = Set(name);
    }
    if let Some(description) = req.description {
        active.description = Set(Some(description));
    }
    if let Some(status) = req.status {
        active.status = Set(status);
    }
    active.updated_at = Set(Utc::now());

    Ok(active.update(db).await?)
}

/// Self-leave or captain-initiated removal
pub async fn remove_member(db: &DbConn, team_id: i64, user_id: i64, actor_id: i64) -> Result<()> {
    db::with_retry(|| remove_member_once(db, team_id, user_id, actor_id)).await
}

async fn remove_member_once(db: &DbConn, team_id: i64, user_id: i64, actor_id: i64) -> Result<()> {
    let txn = db::begin(db).await?;

    let team = get_team(&txn, team_id).await?;
    if !team.is_captain(actor_id) && actor_id != user_id {
        return Err(AppError::Forbidden(
            "You don't have permission to remove this member".to_string(),
        ));
    }
    membership::remove_member(&txn, &team, user_id).await?;

    txn.commit().await?;
    Ok(())
}

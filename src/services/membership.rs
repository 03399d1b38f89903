//! Capacity and single-team checks shared by team creation, the invitation
//! engine and member removal.
//!
//! Every function takes a generic connection so callers run the checks
//! inside the same transaction as the write they guard.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, Set,
};

use crate::error::{AppError, Result};
use crate::models::hackathon;
use crate::models::prelude::*;
use crate::models::team::{self, TeamStatus};
use crate::models::team_member::{self, MemberStatus};
use crate::services::hackathons;

pub async fn count_active_members<C: ConnectionTrait>(conn: &C, team_id: i64) -> Result<u64> {
    Ok(TeamMember::find()
        .filter(team_member::Column::TeamId.eq(team_id))
        .filter(team_member::Column::Status.eq(MemberStatus::Active))
        .count(conn)
        .await?)
}

pub async fn active_membership<C: ConnectionTrait>(
    conn: &C,
    team_id: i64,
    user_id: i64,
) -> Result<Option<team_member::Model>> {
    Ok(TeamMember::find()
        .filter(team_member::Column::TeamId.eq(team_id))
        .filter(team_member::Column::UserId.eq(user_id))
        .filter(team_member::Column::Status.eq(MemberStatus::Active))
        .one(conn)
        .await?)
}

/// Conflict unless the team has room for one more active member
pub async fn ensure_capacity<C: ConnectionTrait>(
    conn: &C,
    team: &team::Model,
    hackathon: &hackathon::Model,
) -> Result<()> {
    let active = count_active_members(conn, team.id).await?;
    if active >= hackathon.max_team_size.max(0) as u64 {
        return Err(AppError::Conflict("Team is full".to_string()));
    }
    Ok(())
}

/// Conflict if the user's registration already points at another team
pub async fn ensure_single_team<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    hackathon_id: i64,
    team_id: i64,
) -> Result<()> {
    let registration = hackathons::get_registration(conn, user_id, hackathon_id).await?;
    match registration.and_then(|r| r.team_id) {
        Some(current) if current != team_id => Err(AppError::Conflict(
            "User is already in a team for this hackathon".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Make `user_id` an active member of `team` and point their registration
/// at it. Re-joining a team the user is already active in inserts nothing.
pub async fn join_team<C: ConnectionTrait>(
    conn: &C,
    team: &team::Model,
    user_id: i64,
) -> Result<()> {
    if team.status != TeamStatus::Open {
        return Err(AppError::Conflict(
            "Team is no longer accepting members".to_string(),
        ));
    }

    let hackathon = hackathons::get_hackathon(conn, team.hackathon_id).await?;
    ensure_capacity(conn, team, &hackathon).await?;
    ensure_single_team(conn, user_id, team.hackathon_id, team.id).await?;

    let existing = TeamMember::find()
        .filter(team_member::Column::TeamId.eq(team.id))
        .filter(team_member::Column::UserId.eq(user_id))
        .one(conn)
        .await?;

    match existing {
        Some(row) if row.status == MemberStatus::Active => {}
        Some(row) => {
            let mut active: team_member::ActiveModel = row.into();
            active.status = Set(MemberStatus::Active);
            active.joined_at = Set(Utc::now());
            active.update(conn).await?;
        }
        None => {
            team_member::ActiveModel {
                team_id: Set(team.id),
                user_id: Set(user_id),
                status: Set(MemberStatus::Active),
                joined_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(conn)
            .await?;
        }
    }

    hackathons::set_registration_team(conn, user_id, team.hackathon_id, Some(team.id)).await?;
    tracing::info!(team_id = team.id, user_id, "User joined team");
    Ok(())
}

/// Delete the user's active membership row and clear the matching
/// registration. Past invitations are left alone.
pub async fn remove_member<C: ConnectionTrait>(
    conn: &C,
    team: &team::Model,
    user_id: i64,
) -> Result<()> {
    if team.is_captain(user_id) {
        return Err(AppError::BadRequest(
            "The captain cannot leave or be removed from the team".to_string(),
        ));
    }

    let member = active_membership(conn, team.id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Member not found in team".to_string()))?;
    member.delete(conn).await?;

    if let Some(reg) = hackathons::get_registration(conn, user_id, team.hackathon_id).await? {
        if reg.team_id == Some(team.id) {
            hackathons::set_registration_team(conn, user_id, team.hackathon_id, None).await?;
        }
    }

    tracing::info!(team_id = team.id, user_id, "User removed from team");
    Ok(())
}

//! Invitation engine.
//!
//! An invitation is either a captain's *invite* to a prospective member or a
//! user's *application* to join a team. Both start `pending` and end
//! `accepted` or `declined`; records are never deleted.
//!
//! Each mutating operation runs its checks and its write in one
//! transaction (SERIALIZABLE on PostgreSQL, retried on serialization
//! failure). The partial unique index on pending (team, user) pairs backs
//! up the duplicate check.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::db::{self, conflict_on_unique};
use crate::error::{AppError, Result};
use crate::models::invitation::{self, InvitationKind, InvitationStatus};
use crate::models::prelude::*;
use crate::models::{team, user};
use crate::schemas::InvitationResponse;
use crate::services::{hackathons, membership, teams, users};
use crate::state::DbConn;

/// How long resolved applications stay visible to their author
const RECENT_OUTCOME_DAYS: i64 = 7;

const DUPLICATE_PENDING: &str = "User already has a pending invitation to this team";

async fn find_invitation<C: ConnectionTrait>(
    conn: &C,
    invitation_id: i64,
) -> Result<invitation::Model> {
    Invitation::find_by_id(invitation_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Invitation not found".to_string()))
}

async fn ensure_no_pending<C: ConnectionTrait>(conn: &C, team_id: i64, user_id: i64) -> Result<()> {
    let pending = Invitation::find()
        .filter(invitation::Column::TeamId.eq(team_id))
        .filter(invitation::Column::UserId.eq(user_id))
        .filter(invitation::Column::Status.eq(InvitationStatus::Pending))
        .one(conn)
        .await?;
    if pending.is_some() {
        return Err(AppError::Conflict(DUPLICATE_PENDING.to_string()));
    }
    Ok(())
}

async fn ensure_not_member<C: ConnectionTrait>(conn: &C, team_id: i64, user_id: i64) -> Result<()> {
    if membership::active_membership(conn, team_id, user_id).await?.is_some() {
        return Err(AppError::Conflict(
            "User is already a member of this team".to_string(),
        ));
    }
    Ok(())
}

async fn insert_pending<C: ConnectionTrait>(
    conn: &C,
    team: &team::Model,
    user_id: i64,
    sent_by_id: i64,
    kind: InvitationKind,
) -> Result<invitation::Model> {
    invitation::ActiveModel {
        team_id: Set(team.id),
        user_id: Set(user_id),
        sent_by_id: Set(sent_by_id),
        kind: Set(kind),
        status: Set(InvitationStatus::Pending),
        created_at: Set(Utc::now()),
        responded_at: Set(None),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|e| conflict_on_unique(e, DUPLICATE_PENDING))
}

/// Move a pending invitation to its terminal state
async fn resolve<C: ConnectionTrait>(
    conn: &C,
    invitation: invitation::Model,
    status: InvitationStatus,
) -> Result<invitation::Model> {
    let mut active: invitation::ActiveModel = invitation.into();
    active.status = Set(status);
    active.responded_at = Set(Some(Utc::now()));
    Ok(active.update(conn).await?)
}

fn ensure_pending(invitation: &invitation::Model) -> Result<()> {
    if !invitation.is_pending() {
        return Err(AppError::Conflict(format!(
            "Invitation already {}",
            invitation.status
        )));
    }
    Ok(())
}

/// Captain invites `invitee_id` to their team
pub async fn create_invite(
    db: &DbConn,
    team_id: i64,
    invitee_id: i64,
    actor_id: i64,
) -> Result<invitation::Model> {
    db::with_retry(|| create_invite_once(db, team_id, invitee_id, actor_id)).await
}

async fn create_invite_once(
    db: &DbConn,
    team_id: i64,
    invitee_id: i64,
    actor_id: i64,
) -> Result<invitation::Model> {
    let txn = db::begin(db).await?;

    let team = teams::get_team(&txn, team_id).await?;
    if !team.is_captain(actor_id) {
        return Err(AppError::Forbidden(
            "Only team captain can send invitations".to_string(),
        ));
    }
    let hackathon = hackathons::get_hackathon(&txn, team.hackathon_id).await?;
    membership::ensure_capacity(&txn, &team, &hackathon).await?;
    users::get_user(&txn, invitee_id).await?;
    ensure_not_member(&txn, team.id, invitee_id).await?;
    ensure_no_pending(&txn, team.id, invitee_id).await?;

    let registration = hackathons::get_registration(&txn, invitee_id, team.hackathon_id).await?;
    if registration.and_then(|r| r.team_id).is_some() {
        return Err(AppError::Conflict(
            "User is already in a team for this hackathon".to_string(),
        ));
    }

    let created = insert_pending(&txn, &team, invitee_id, actor_id, InvitationKind::Invite).await?;
    txn.commit().await?;

    tracing::info!(invitation_id = created.id, team_id, invitee_id, "Invite sent");
    Ok(created)
}

/// User asks to join a team
pub async fn create_application(
    db: &DbConn,
    team_id: i64,
    actor_id: i64,
) -> Result<invitation::Model> {
    db::with_retry(|| create_application_once(db, team_id, actor_id)).await
}

async fn create_application_once(
    db: &DbConn,
    team_id: i64,
    actor_id: i64,
) -> Result<invitation::Model> {
    let txn = db::begin(db).await?;

    let team = teams::get_team(&txn, team_id).await?;
    if team.status != team::TeamStatus::Open {
        return Err(AppError::Conflict(
            "Team is not accepting applications".to_string(),
        ));
    }
    if team.is_captain(actor_id) {
        return Err(AppError::BadRequest(
            "Captain cannot apply to their own team".to_string(),
        ));
    }
    let hackathon = hackathons::get_hackathon(&txn, team.hackathon_id).await?;
    membership::ensure_capacity(&txn, &team, &hackathon).await?;

    let registration = hackathons::get_registration(&txn, actor_id, team.hackathon_id)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest("You must register for the hackathon first".to_string())
        })?;
    if matches!(registration.team_id, Some(current) if current != team.id) {
        return Err(AppError::Conflict(
            "You are already in a team for this hackathon".to_string(),
        ));
    }
    ensure_not_member(&txn, team.id, actor_id).await?;
    ensure_no_pending(&txn, team.id, actor_id).await?;

    let created =
        insert_pending(&txn, &team, actor_id, actor_id, InvitationKind::Application).await?;
    txn.commit().await?;

    tracing::info!(
        invitation_id = created.id,
        team_id,
        user_id = actor_id,
        "Application submitted"
    );
    Ok(created)
}

/// Invitee accepts or declines a captain's invite
pub async fn respond_to_invite(
    db: &DbConn,
    invitation_id: i64,
    actor_id: i64,
    accept: bool,
) -> Result<invitation::Model> {
    db::with_retry(|| respond_to_invite_once(db, invitation_id, actor_id, accept)).await
}

async fn respond_to_invite_once(
    db: &DbConn,
    invitation_id: i64,
    actor_id: i64,
    accept: bool,
) -> Result<invitation::Model> {
    let txn = db::begin(db).await?;

    let invitation = find_invitation(&txn, invitation_id).await?;
    if invitation.user_id != actor_id {
        return Err(AppError::Forbidden(
            "This invitation is not for you".to_string(),
        ));
    }
    ensure_pending(&invitation)?;
    if invitation.kind != InvitationKind::Invite {
        return Err(AppError::BadRequest(
            "This is an application; the team captain must approve or reject it".to_string(),
        ));
    }

    let status = if accept {
        let team = teams::get_team(&txn, invitation.team_id).await?;
        membership::join_team(&txn, &team, actor_id).await?;
        InvitationStatus::Accepted
    } else {
        InvitationStatus::Declined
    };

    let updated = resolve(&txn, invitation, status).await?;
    txn.commit().await?;

    tracing::info!(invitation_id, user_id = actor_id, status = %updated.status, "Invite answered");
    Ok(updated)
}

/// Captain approves a pending application
pub async fn approve_application(
    db: &DbConn,
    invitation_id: i64,
    actor_id: i64,
) -> Result<invitation::Model> {
    db::with_retry(|| decide_application_once(db, invitation_id, actor_id, true)).await
}

/// Captain rejects a pending application
pub async fn reject_application(
    db: &DbConn,
    invitation_id: i64,
    actor_id: i64,
) -> Result<invitation::Model> {
    db::with_retry(|| decide_application_once(db, invitation_id, actor_id, false)).await
}

async fn decide_application_once(
    db: &DbConn,
    invitation_id: i64,
    actor_id: i64,
    approve: bool,
) -> Result<invitation::Model> {
    let txn = db::begin(db).await?;

    let invitation = find_invitation(&txn, invitation_id).await?;
    let team = teams::get_team(&txn, invitation.team_id).await?;
    if !team.is_captain(actor_id) {
        return Err(AppError::Forbidden(
            "Only team captain can review applications".to_string(),
        ));
    }
    if invitation.kind != InvitationKind::Application {
        return Err(AppError::BadRequest(
            "This is an invite; only the invited user can respond to it".to_string(),
        ));
    }
    ensure_pending(&invitation)?;

    let status = if approve {
        membership::join_team(&txn, &team, invitation.user_id).await?;
        InvitationStatus::Accepted
    } else {
        InvitationStatus::Declined
    };

    let updated = resolve(&txn, invitation, status).await?;
    txn.commit().await?;

    tracing::info!(
        invitation_id,
        team_id = team.id,
        status = %updated.status,
        "Application reviewed"
    );
    Ok(updated)
}

/// Pending invites addressed to the user, newest first, followed by the
/// user's own applications resolved in the last week, most recently
/// resolved first
pub async fn list_my_invitations(db: &DbConn, user_id: i64) -> Result<Vec<invitation::Model>> {
    let mut invites = Invitation::find()
        .filter(invitation::Column::UserId.eq(user_id))
        .filter(invitation::Column::Kind.eq(InvitationKind::Invite))
        .filter(invitation::Column::Status.eq(InvitationStatus::Pending))
        .order_by_desc(invitation::Column::CreatedAt)
        .order_by_desc(invitation::Column::Id)
        .all(db)
        .await?;

    let cutoff = Utc::now() - Duration::days(RECENT_OUTCOME_DAYS);
    let outcomes = Invitation::find()
        .filter(invitation::Column::UserId.eq(user_id))
        .filter(invitation::Column::Kind.eq(InvitationKind::Application))
        .filter(invitation::Column::Status.ne(InvitationStatus::Pending))
        .filter(invitation::Column::RespondedAt.gte(cutoff))
        .order_by_desc(invitation::Column::RespondedAt)
        .order_by_desc(invitation::Column::Id)
        .all(db)
        .await?;

    invites.extend(outcomes);
    Ok(invites)
}

/// Pending applications to every team the user captains, newest first
pub async fn list_my_team_applications(
    db: &DbConn,
    captain_id: i64,
) -> Result<Vec<invitation::Model>> {
    let team_ids: Vec<i64> = Team::find()
        .filter(team::Column::CaptainId.eq(captain_id))
        .all(db)
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();

    if team_ids.is_empty() {
        return Ok(Vec::new());
    }

    Ok(Invitation::find()
        .filter(invitation::Column::TeamId.is_in(team_ids))
        .filter(invitation::Column::Kind.eq(InvitationKind::Application))
        .filter(invitation::Column::Status.eq(InvitationStatus::Pending))
        .filter(invitation::Column::UserId.ne(captain_id))
        .order_by_desc(invitation::Column::CreatedAt)
        .order_by_desc(invitation::Column::Id)
        .all(db)
        .await?)
}

/// Every pending invite and application of one team (captain only)
pub async fn list_team_pending(
    db: &DbConn,
    team_id: i64,
    actor_id: i64,
) -> Result<Vec<invitation::Model>> {
    let team = teams::get_team(db, team_id).await?;
    if !team.is_captain(actor_id) {
        return Err(AppError::Forbidden(
            "Only team captain can view invitations".to_string(),
        ));
    }

    Ok(Invitation::find()
        .filter(invitation::Column::TeamId.eq(team_id))
        .filter(invitation::Column::Status.eq(InvitationStatus::Pending))
        .order_by_desc(invitation::Column::CreatedAt)
        .order_by_desc(invitation::Column::Id)
        .all(db)
        .await?)
}

/// Attach team and user names for display
pub async fn describe(
    db: &DbConn,
    invitations: Vec<invitation::Model>,
) -> Result<Vec<InvitationResponse>> {
    if invitations.is_empty() {
        return Ok(Vec::new());
    }

    let team_ids: HashSet<i64> = invitations.iter().map(|i| i.team_id).collect();
    let user_ids: HashSet<i64> = invitations
        .iter()
        .flat_map(|i| [i.user_id, i.sent_by_id])
        .collect();

    let team_names: HashMap<i64, String> = Team::find()
        .filter(team::Column::Id.is_in(team_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect();
    let user_names: HashMap<i64, String> = User::find()
        .filter(user::Column::Id.is_in(user_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.full_name))
        .collect();

    let name_of =
        |names: &HashMap<i64, String>, id: i64| names.get(&id).cloned().unwrap_or_default();

    Ok(invitations
        .into_iter()
        .map(|i| InvitationResponse {
            team_name: name_of(&team_names, i.team_id),
            user_name: name_of(&user_names, i.user_id),
            sent_by_name: name_of(&user_names, i.sent_by_id),
            id: i.id,
            team_id: i.team_id,
            user_id: i.user_id,
            sent_by_id: i.sent_by_id,
            kind: i.kind,
            status: i.status,
            created_at: i.created_at,
            responded_at: i.responded_at,
        })
        .collect())
}

use axum::{
    extract::{Extension, Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::invitation::InvitationStatus;
use crate::schemas::{InvitationActionResponse, InvitationResponse, RespondRequest};
use crate::services::invitations;
use crate::state::AppState;

/// Create invitations routes
pub fn invitations_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_my_invitations))
        .route("/applications", get(list_my_team_applications))
        .route("/team/{team_id}/pending", get(list_team_pending))
        .route("/{invitation_id}/accept", post(respond))
        .route("/{invitation_id}/approve", post(approve))
        .route("/{invitation_id}/reject", post(reject))
        .with_state(state)
}

fn action_response(verb: &str, invitation_id: i64) -> Json<InvitationActionResponse> {
    Json(InvitationActionResponse {
        message: format!("Invitation {}", verb),
        invitation_id,
    })
}

/// Pending invites for the caller plus recent outcomes of their applications
async fn list_my_invitations(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<InvitationResponse>>> {
    let list = invitations::list_my_invitations(&state.db, auth_user.0.id).await?;
    Ok(Json(invitations::describe(&state.db, list).await?))
}

/// Pending applications to teams the caller captains
async fn list_my_team_applications(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<InvitationResponse>>> {
    let list = invitations::list_my_team_applications(&state.db, auth_user.0.id).await?;
    Ok(Json(invitations::describe(&state.db, list).await?))
}

async fn list_team_pending(
    State(state): State<AppState>,
    Path(team_id): Path<i64>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<InvitationResponse>>> {
    let list = invitations::list_team_pending(&state.db, team_id, auth_user.0.id).await?;
    Ok(Json(invitations::describe(&state.db, list).await?))
}

/// Invitee accepts or declines a captain's invite
async fn respond(
    State(state): State<AppState>,
    Path(invitation_id): Path<i64>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(req): Json<RespondRequest>,
) -> Result<Json<InvitationActionResponse>> {
    let updated =
        invitations::respond_to_invite(&state.db, invitation_id, auth_user.0.id, req.accept)
            .await?;
    let verb = if updated.status == InvitationStatus::Accepted {
        "accepted"
    } else {
        "declined"
    };
    Ok(action_response(verb, invitation_id))
}

async fn approve(
    State(state): State<AppState>,
    Path(invitation_id): Path<i64>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<InvitationActionResponse>> {
    invitations::approve_application(&state.db, invitation_id, auth_user.0.id).await?;
    Ok(action_response("approved", invitation_id))
}

async fn reject(
    State(state): State<AppState>,
    Path(invitation_id): Path<i64>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<InvitationActionResponse>> {
    invitations::reject_application(&state.db, invitation_id, auth_user.0.id).await?;
    Ok(action_response("rejected", invitation_id))
}

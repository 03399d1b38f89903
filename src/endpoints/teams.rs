use axum::{
    extract::{Extension, Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};

use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::team::TeamStatus;
use crate::schemas::{
    CreateTeamRequest, InvitationActionResponse, InviteRequest, MessageResponse, MyTeamItem,
    TeamDetailResponse, TeamListParams, TeamResponse, UpdateTeamRequest,
};
use crate::services::{hackathons, invitations, teams, users};
use crate::state::AppState;

/// Create teams routes
pub fn teams_routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(create_team))
        .route("/my", get(list_my_teams))
        .route("/hackathons/{hackathon_id}", get(list_hackathon_teams))
        .route("/{team_id}", get(get_team).patch(update_team))
        .route("/{team_id}/invite", post(invite))
        .route("/{team_id}/apply", post(apply))
        .route("/{team_id}/members/{user_id}", delete(remove_member))
        .with_state(state)
}

async fn team_response(state: &AppState, team: crate::models::team::Model) -> Result<TeamResponse> {
    let members = teams::list_members(&state.db, team.id).await?;
    Ok(TeamResponse::with_members(team, members))
}

async fn create_team(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(req): Json<CreateTeamRequest>,
) -> Result<Json<TeamResponse>> {
    let team = teams::create_team(&state.db, auth_user.0.id, req).await?;
    Ok(Json(team_response(&state, team).await?))
}

async fn list_my_teams(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<MyTeamItem>>> {
    Ok(Json(teams::list_my_teams(&state.db, auth_user.0.id).await?))
}

/// Teams of a hackathon, open ones unless `status_filter` says otherwise
async fn list_hackathon_teams(
    State(state): State<AppState>,
    Path(hackathon_id): Path<i64>,
    Query(params): Query<TeamListParams>,
) -> Result<Json<Vec<TeamResponse>>> {
    hackathons::get_hackathon(&state.db, hackathon_id).await?;

    let status = params.status_filter.unwrap_or(TeamStatus::Open);
    let list = teams::list_by_hackathon(&state.db, hackathon_id, status).await?;

    Ok(Json(
        list.into_iter()
            .map(|(team, members)| TeamResponse::with_members(team, members))
            .collect(),
    ))
}

/// Team with members and captain profile
async fn get_team(
    State(state): State<AppState>,
    Path(team_id): Path<i64>,
) -> Result<Json<TeamDetailResponse>> {
    let team = teams::get_team(&state.db, team_id).await?;
    let captain = users::get_user(&state.db, team.captain_id).await?;

    Ok(Json(TeamDetailResponse {
        team: team_response(&state, team).await?,
        captain: captain.into(),
    }))
}

async fn update_team(
    State(state): State<AppState>,
    Path(team_id): Path<i64>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(req): Json<UpdateTeamRequest>,
) -> Result<Json<TeamResponse>> {
    let team = teams::update_team(&state.db, team_id, auth_user.0.id, req).await?;
    Ok(Json(team_response(&state, team).await?))
}

/// Captain invites a user
async fn invite(
    State(state): State<AppState>,
    Path(team_id): Path<i64>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(req): Json<InviteRequest>,
) -> Result<Json<InvitationActionResponse>> {
    let invitation =
        invitations::create_invite(&state.db, team_id, req.user_id, auth_user.0.id).await?;

    Ok(Json(InvitationActionResponse {
        message: "Invitation sent".to_string(),
        invitation_id: invitation.id,
    }))
}

/// Caller applies to join
async fn apply(
    State(state): State<AppState>,
    Path(team_id): Path<i64>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<InvitationActionResponse>> {
    let application = invitations::create_application(&state.db, team_id, auth_user.0.id).await?;

    Ok(Json(InvitationActionResponse {
        message: "Application sent".to_string(),
        invitation_id: application.id,
    }))
}

/// Captain removes a member, or a member leaves
async fn remove_member(
    State(state): State<AppState>,
    Path((team_id, user_id)): Path<(i64, i64)>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<MessageResponse>> {
    teams::remove_member(&state.db, team_id, user_id, auth_user.0.id).await?;
    Ok(Json(MessageResponse::new("Member removed")))
}

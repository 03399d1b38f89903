use axum::{
    extract::{Extension, Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::schemas::{ListParams, UpdateProfileRequest, UserListItem, UserProfile};
use crate::services::{hackathons, users};
use crate::state::AppState;

/// Create users routes
pub fn users_routes(state: AppState) -> Router {
    Router::new()
        .route("/me", get(get_me).put(update_me))
        .route("/{user_id}", get(get_user))
        .route(
            "/hackathons/{hackathon_id}/participants",
            get(list_participants),
        )
        .with_state(state)
}

/// Current user's profile
async fn get_me(Extension(auth_user): Extension<AuthenticatedUser>) -> Json<UserProfile> {
    Json(auth_user.0.into())
}

/// Update current user's profile
async fn update_me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>> {
    let updated = users::update_profile(&state.db, auth_user.0, req).await?;
    Ok(Json(updated.into()))
}

/// Another participant's profile
async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserProfile>> {
    let user = users::get_user(&state.db, user_id).await?;
    Ok(Json(user.into()))
}

/// Participants of a hackathon, excluding the caller
async fn list_participants(
    State(state): State<AppState>,
    Path(hackathon_id): Path<i64>,
    Query(params): Query<ListParams>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<UserListItem>>> {
    hackathons::get_hackathon(&state.db, hackathon_id).await?;

    let participants = users::list_participants(
        &state.db,
        hackathon_id,
        auth_user.0.id,
        params.skip(),
        params.limit(),
    )
    .await?;

    Ok(Json(participants.into_iter().map(UserListItem::from).collect()))
}

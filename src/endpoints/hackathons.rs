//! Hackathon routes
//!
//! Reads and registration are open to participants; creation and edits are
//! admin-only. Both routers use full paths so they can be merged under their
//! own auth layers.

use axum::{
    extract::{Extension, Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};

use crate::error::Result;
use crate::middleware::{AuthenticatedAdmin, AuthenticatedUser};
use crate::schemas::{
    CreateHackathonRequest, HackathonDetailResponse, HackathonResponse, ListParams,
    RegistrationResponse, UpdateHackathonRequest,
};
use crate::services::hackathons;
use crate::state::AppState;

/// Participant-facing hackathon routes
pub fn hackathons_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/hackathons", get(list_hackathons))
        .route("/api/hackathons/{hackathon_id}", get(get_hackathon))
        .route("/api/hackathons/{hackathon_id}/register", post(register))
        .with_state(state)
}

/// Admin-only hackathon routes
pub fn hackathon_admin_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/hackathons", post(create_hackathon))
        .route("/api/hackathons/{hackathon_id}", put(update_hackathon))
        .with_state(state)
}

async fn list_hackathons(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<HackathonResponse>>> {
    let list = hackathons::list_hackathons(&state.db, params.skip(), params.limit()).await?;
    Ok(Json(list.into_iter().map(HackathonResponse::from).collect()))
}

/// Hackathon with the caller's registration state
async fn get_hackathon(
    State(state): State<AppState>,
    Path(hackathon_id): Path<i64>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<HackathonDetailResponse>> {
    let hackathon = hackathons::get_hackathon(&state.db, hackathon_id).await?;
    let registration =
        hackathons::get_registration(&state.db, auth_user.0.id, hackathon_id).await?;

    Ok(Json(HackathonDetailResponse {
        hackathon: hackathon.into(),
        is_registered: registration.is_some(),
        team_id: registration.and_then(|r| r.team_id),
    }))
}

async fn register(
    State(state): State<AppState>,
    Path(hackathon_id): Path<i64>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<RegistrationResponse>> {
    hackathons::register(&state.db, auth_user.0.id, hackathon_id).await?;

    Ok(Json(RegistrationResponse {
        message: "Registered successfully".to_string(),
        hackathon_id,
    }))
}

async fn create_hackathon(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Json(req): Json<CreateHackathonRequest>,
) -> Result<Json<HackathonResponse>> {
    let created = hackathons::create_hackathon(&state.db, req).await?;
    tracing::info!(admin_id = admin.0.id, hackathon_id = created.id, "Hackathon created");
    Ok(Json(created.into()))
}

async fn update_hackathon(
    State(state): State<AppState>,
    Path(hackathon_id): Path<i64>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Json(req): Json<UpdateHackathonRequest>,
) -> Result<Json<HackathonResponse>> {
    let updated = hackathons::update_hackathon(&state.db, hackathon_id, req).await?;
    tracing::info!(admin_id = admin.0.id, hackathon_id, "Hackathon updated");
    Ok(Json(updated.into()))
}

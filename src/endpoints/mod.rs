pub mod admin;
pub mod auth;
pub mod hackathons;
pub mod invitations;
pub mod teams;
pub mod users;

use axum::{middleware as axum_middleware, routing::get, Json, Router};
use serde_json::json;

use crate::middleware::{require_admin, require_user};
use crate::state::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/auth", auth::auth_routes(state.clone()));

    // Participant routes
    let user_routes = Router::new()
        .nest("/api/users", users::users_routes(state.clone()))
        .nest("/api/teams", teams::teams_routes(state.clone()))
        .nest("/api/invitations", invitations::invitations_routes(state.clone()))
        .merge(hackathons::hackathons_routes(state.clone()))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_user,
        ));

    // Admin routes; hackathon writes share paths with the participant reads
    let admin_routes = Router::new()
        .nest("/api/admin", admin::admin_routes(state.clone()))
        .merge(hackathons::hackathon_admin_routes(state.clone()))
        .layer(axum_middleware::from_fn_with_state(state, require_admin));

    public_routes.merge(user_routes).merge(admin_routes)
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Service banner
async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Hackmate team-formation API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

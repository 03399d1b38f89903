//! Admin analytics and CSV exports

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::error::{AppError, Result};
use crate::schemas::{HackathonAnalytics, HackathonResponse};
use crate::services::{analytics, hackathons};
use crate::state::AppState;

/// Create admin routes
pub fn admin_routes(state: AppState) -> Router {
    Router::new()
        .route("/hackathons", get(list_all_hackathons))
        .route("/{hackathon_id}/analytics", get(get_analytics))
        .route("/{hackathon_id}/participants/export", get(export_participants))
        .route("/{hackathon_id}/teams/export", get(export_teams))
        .with_state(state)
}

/// `text/csv` download named `filename`
fn csv_attachment(filename: &str, body: String) -> Result<Response> {
    let disposition = HeaderValue::from_str(&format!("attachment; filename={}", filename))
        .map_err(|e| AppError::Internal(format!("Invalid export filename: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/csv; charset=utf-8")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// Every hackathon, newest first
async fn list_all_hackathons(
    State(state): State<AppState>,
) -> Result<Json<Vec<HackathonResponse>>> {
    let list = hackathons::list_all_hackathons(&state.db).await?;
    Ok(Json(list.into_iter().map(HackathonResponse::from).collect()))
}

async fn get_analytics(
    State(state): State<AppState>,
    Path(hackathon_id): Path<i64>,
) -> Result<Json<HackathonAnalytics>> {
    Ok(Json(
        analytics::hackathon_analytics(&state.db, hackathon_id).await?,
    ))
}

async fn export_participants(
    State(state): State<AppState>,
    Path(hackathon_id): Path<i64>,
) -> Result<Response> {
    let csv = analytics::export_participants_csv(&state.db, hackathon_id).await?;
    csv_attachment(&format!("participants_{}.csv", hackathon_id), csv)
}

async fn export_teams(
    State(state): State<AppState>,
    Path(hackathon_id): Path<i64>,
) -> Result<Response> {
    let csv = analytics::export_teams_csv(&state.db, hackathon_id).await?;
    csv_attachment(&format!("teams_{}.csv", hackathon_id), csv)
}

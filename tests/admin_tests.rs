//! Admin hackathon management, analytics and CSV exports

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::json;

mod common;
use common::TestApp;

fn hackathon_body(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "description": "weekend build",
        "start_date": "2030-06-01T09:00:00Z",
        "end_date": "2030-06-02T18:00:00Z",
    })
}

async fn download(app: &TestApp, uri: &str, token: &str) -> (StatusCode, String, String, String) {
    let request = Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (
        status,
        content_type,
        disposition,
        String::from_utf8(bytes.to_vec()).unwrap(),
    )
}

// ============================================================================
// Hackathon management
// ============================================================================

#[tokio::test]
async fn test_create_hackathon_defaults() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, body) = app
        .post("/api/hackathons", &admin, hackathon_body("Defaults Jam"))
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["name"], "Defaults Jam");
    assert_eq!(body["max_team_size"], 5);
    assert_eq!(body["status"], "upcoming");
}

#[tokio::test]
async fn test_duplicate_hackathon_name_conflicts() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    app.post("/api/hackathons", &admin, hackathon_body("Twice")).await;
    let (status, body) = app
        .post("/api/hackathons", &admin, hackathon_body("Twice"))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["detail"], "Hackathon with this name already exists");
}

#[tokio::test]
async fn test_invalid_hackathon_window_is_rejected() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, _) = app
        .post(
            "/api/hackathons",
            &admin,
            json!({
                "name": "Backwards",
                "start_date": "2030-06-02T00:00:00Z",
                "end_date": "2030-06-01T00:00:00Z",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/hackathons",
            &admin,
            json!({
                "name": "Nobody Fits",
                "start_date": "2030-06-01T00:00:00Z",
                "end_date": "2030-06-02T00:00:00Z",
                "max_team_size": 0,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_hackathon_is_partial() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let id = app.create_hackathon("Editable", 4).await;

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/api/hackathons/{}", id),
            Some(&admin),
            Some(json!({ "status": "active", "max_team_size": 6 })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["name"], "Editable");
    assert_eq!(body["status"], "active");
    assert_eq!(body["max_team_size"], 6);

    let (status, _) = app
        .request(
            Method::PUT,
            "/api/hackathons/31337",
            Some(&admin),
            Some(json!({ "status": "finished" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_lists_all_hackathons_newest_first() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let older = app.create_hackathon("Older", 4).await;
    let newer = app.create_hackathon("Newer", 4).await;

    let (status, body) = app.get("/api/admin/hackathons", &admin).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![newer, older]);
}

// ============================================================================
// Analytics and exports
// ============================================================================

#[tokio::test]
async fn test_analytics_counts_participants_and_teams() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let hackathon = app.create_hackathon("Analytics Jam", 4).await;
    let captain = app.login_user("Captain").await;
    let member = app.login_user("Member").await;
    let solo = app.login_user("Solo").await;

    app.request(
        Method::PUT,
        "/api/users/me",
        Some(&solo.token),
        Some(json!({ "skills": ["rust", "sql"], "experience_level": "senior" })),
    )
    .await;

    let team = app.create_team(&captain, hackathon, "Counted").await;
    let invitation = app.invite(&captain, team, &member).await;
    app.post(
        &format!("/api/invitations/{}/accept", invitation),
        &member.token,
        json!({ "accept": true }),
    )
    .await;
    app.register(&solo, hackathon).await;

    let (status, body) = app
        .get(&format!("/api/admin/{}/analytics", hackathon), &admin)
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["total_participants"], 3);
    assert_eq!(body["total_teams"], 1);
    assert_eq!(body["participants_in_team"], 2);
    assert_eq!(body["participants_without_team"], 1);
    assert_eq!(body["average_team_size"], 3.0);
    assert_eq!(body["skills_frequency"]["rust"], 1);
    assert_eq!(body["experience_distribution"]["junior"], 2);
    assert_eq!(body["experience_distribution"]["senior"], 1);
}

#[tokio::test]
async fn test_analytics_for_unknown_hackathon_is_not_found() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, _) = app.get("/api/admin/55555/analytics", &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_participants_export_is_csv_attachment() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let hackathon = app.create_hackathon("Export Jam", 4).await;
    let captain = app.login_user("Captain, Esq.").await;
    app.create_team(&captain, hackathon, "Exporters").await;

    let (status, content_type, disposition, body) = download(
        &app,
        &format!("/api/admin/{}/participants/export", hackathon),
        &admin,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/csv"));
    assert_eq!(
        disposition,
        format!("attachment; filename=participants_{}.csv", hackathon)
    );

    let mut lines = body.lines();
    assert_eq!(
        lines.next().unwrap(),
        "ID,Full Name,Telegram Username,Skills,Role Preference,Experience Level,Team Name,Team Status"
    );
    let row = lines.next().unwrap();
    assert!(row.contains("\"Captain, Esq.\""), "name must be quoted: {}", row);
    assert!(row.ends_with("Exporters,open"));
    assert!(lines.next().is_none());
}

#[tokio::test]
async fn test_teams_export_lists_members() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let hackathon = app.create_hackathon("Team Export", 4).await;
    let captain = app.login_user("Linus").await;
    let member = app.login_user("Ken").await;
    let team = app.create_team(&captain, hackathon, "Kernel").await;
    let invitation = app.invite(&captain, team, &member).await;
    app.post(
        &format!("/api/invitations/{}/accept", invitation),
        &member.token,
        json!({ "accept": true }),
    )
    .await;

    let (status, _, disposition, body) = download(
        &app,
        &format!("/api/admin/{}/teams/export", hackathon),
        &admin,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        disposition,
        format!("attachment; filename=teams_{}.csv", hackathon)
    );
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(
        lines[0],
        "Team ID,Team Name,Team Status,Captain Name,Member Count,Members"
    );
    assert_eq!(
        lines[1],
        format!("{},Kernel,open,Linus,2,\"Linus, Ken\"", team)
    );
}

//! Profile and participant listing endpoints

use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;
use common::TestApp;

#[tokio::test]
async fn test_get_my_profile_defaults() {
    let app = TestApp::new().await;
    let user = app.login_user("Fresh").await;

    let (status, body) = app.get("/api/users/me", &user.token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user.id);
    assert_eq!(body["telegram_id"], user.telegram_id);
    assert_eq!(body["experience_level"], "junior");
    assert_eq!(body["skills"], json!([]));
}

#[tokio::test]
async fn test_update_my_profile() {
    let app = TestApp::new().await;
    let user = app.login_user("Before").await;

    let (status, body) = app
        .request(
            Method::PUT,
            "/api/users/me",
            Some(&user.token),
            Some(json!({
                "full_name": "After",
                "bio": "systems programmer",
                "skills": ["rust", "postgres"],
                "role_preference": "backend",
                "experience_level": "middle",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["full_name"], "After");
    assert_eq!(body["bio"], "systems programmer");
    assert_eq!(body["skills"], json!(["rust", "postgres"]));
    assert_eq!(body["role_preference"], "backend");
    assert_eq!(body["experience_level"], "middle");
}

#[tokio::test]
async fn test_update_profile_rejects_unknown_experience_level() {
    let app = TestApp::new().await;
    let user = app.login_user("Wizard").await;

    let (status, body) = app
        .request(
            Method::PUT,
            "/api/users/me",
            Some(&user.token),
            Some(json!({ "experience_level": "wizard" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "bad_request");
}

#[tokio::test]
async fn test_get_other_profile() {
    let app = TestApp::new().await;
    let viewer = app.login_user("Viewer").await;
    let other = app.login_user("Other").await;

    let (status, body) = app
        .get(&format!("/api/users/{}", other.id), &viewer.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_name"], "Other");

    let (status, _) = app.get("/api/users/424242", &viewer.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_participants_exclude_caller_and_paginate() {
    let app = TestApp::new().await;
    let hackathon = app.create_hackathon("Participants", 4).await;
    let caller = app.login_user("Caller").await;
    app.register(&caller, hackathon).await;

    let mut others = Vec::new();
    for name in ["One", "Two", "Three"] {
        let user = app.login_user(name).await;
        app.register(&user, hackathon).await;
        others.push(user.id);
    }
    // Not registered, never listed
    app.login_user("Bystander").await;

    let uri = format!("/api/users/hackathons/{}/participants", hackathon);
    let (status, body) = app.get(&uri, &caller.token).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, others);

    let (_, page) = app
        .get(&format!("{}?skip=1&limit=1", uri), &caller.token)
        .await;
    let page = page.as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["id"], others[1]);
}

#[tokio::test]
async fn test_participants_of_unknown_hackathon_is_not_found() {
    let app = TestApp::new().await;
    let user = app.login_user("Curious").await;

    let (status, _) = app
        .get("/api/users/hackathons/999/participants", &user.token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_hackathon_registration() {
    let app = TestApp::new().await;
    let hackathon = app.create_hackathon("Registration", 4).await;
    let user = app.login_user("Registrant").await;

    let (_, before) = app
        .get(&format!("/api/hackathons/{}", hackathon), &user.token)
        .await;
    assert_eq!(before["is_registered"], false);

    let uri = format!("/api/hackathons/{}/register", hackathon);
    let (status, body) = app.post(&uri, &user.token, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Registered successfully");
    assert_eq!(body["hackathon_id"], hackathon);

    let (status, body) = app.post(&uri, &user.token, json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["detail"], "Already registered for this hackathon");

    let (_, after) = app
        .get(&format!("/api/hackathons/{}", hackathon), &user.token)
        .await;
    assert_eq!(after["is_registered"], true);
    assert!(after["team_id"].is_null());
}

#[tokio::test]
async fn test_list_hackathons_by_start_date() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let user = app.login_user("Browser").await;

    for (name, start) in [("Later", "2031-01-01T00:00:00Z"), ("Sooner", "2030-01-01T00:00:00Z")] {
        let (status, _) = app
            .post(
                "/api/hackathons",
                &admin,
                json!({ "name": name, "start_date": start, "end_date": "2031-12-31T00:00:00Z" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = app.get("/api/hackathons", &user.token).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Sooner", "Later"]);
}

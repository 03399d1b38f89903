//! Team endpoint integration tests

use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;
use common::TestApp;

#[tokio::test]
async fn test_create_team_makes_creator_captain_and_member() {
    let app = TestApp::new().await;
    let hackathon = app.create_hackathon("Team Create", 4).await;
    let captain = app.login_user("Captain").await;
    app.register(&captain, hackathon).await;

    let (status, body) = app
        .post(
            "/api/teams",
            &captain.token,
            json!({
                "hackathon_id": hackathon,
                "name": "Borrow Checkers",
                "description": "We share nothing mutable",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["name"], "Borrow Checkers");
    assert_eq!(body["captain_id"], captain.id);
    assert_eq!(body["status"], "open");
    assert_eq!(body["members"].as_array().unwrap().len(), 1);

    let (_, detail) = app
        .get(&format!("/api/hackathons/{}", hackathon), &captain.token)
        .await;
    assert_eq!(detail["team_id"], body["id"]);
}

#[tokio::test]
async fn test_create_team_requires_registration() {
    let app = TestApp::new().await;
    let hackathon = app.create_hackathon("Unregistered Team", 4).await;
    let user = app.login_user("Eager").await;

    let (status, body) = app
        .post(
            "/api/teams",
            &user.token,
            json!({ "hackathon_id": hackathon, "name": "Too Soon" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "You must register for the hackathon first");
}

#[tokio::test]
async fn test_create_second_team_in_same_hackathon_conflicts() {
    let app = TestApp::new().await;
    let hackathon = app.create_hackathon("Two Teams", 4).await;
    let captain = app.login_user("Captain").await;
    app.create_team(&captain, hackathon, "First").await;

    let (status, _) = app
        .post(
            "/api/teams",
            &captain.token,
            json!({ "hackathon_id": hackathon, "name": "Second" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_team_for_unknown_hackathon_is_not_found() {
    let app = TestApp::new().await;
    let user = app.login_user("Lost").await;

    let (status, body) = app
        .post(
            "/api/teams",
            &user.token,
            json!({ "hackathon_id": 424242, "name": "Nowhere" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Hackathon not found");
}

#[tokio::test]
async fn test_get_team_includes_captain_profile() {
    let app = TestApp::new().await;
    let hackathon = app.create_hackathon("Team Detail", 4).await;
    let captain = app.login_user("Grace").await;
    let viewer = app.login_user("Viewer").await;
    let team = app.create_team(&captain, hackathon, "Compilers").await;

    let (status, body) = app.get(&format!("/api/teams/{}", team), &viewer.token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], team);
    assert_eq!(body["captain"]["id"], captain.id);
    assert_eq!(body["captain"]["full_name"], "Grace");
    assert_eq!(body["members"][0]["full_name"], "Grace");

    let (status, _) = app.get("/api/teams/987654", &viewer.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_my_teams_lists_hackathon_name() {
    let app = TestApp::new().await;
    let hackathon = app.create_hackathon("My Teams Jam", 4).await;
    let captain = app.login_user("Captain").await;
    let team = app.create_team(&captain, hackathon, "Mine").await;

    let (status, body) = app.get("/api/teams/my", &captain.token).await;

    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], team);
    assert_eq!(list[0]["hackathon_name"], "My Teams Jam");

    let loner = app.login_user("Loner").await;
    let (_, body) = app.get("/api/teams/my", &loner.token).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_hackathon_teams_filters_by_status() {
    let app = TestApp::new().await;
    let hackathon = app.create_hackathon("Team Listing", 4).await;
    let open_captain = app.login_user("Open Captain").await;
    let closed_captain = app.login_user("Closed Captain").await;
    let open_team = app.create_team(&open_captain, hackathon, "Open").await;
    let closed_team = app.create_team(&closed_captain, hackathon, "Closed").await;

    let (status, _) = app
        .request(
            Method::PATCH,
            &format!("/api/teams/{}", closed_team),
            Some(&closed_captain.token),
            Some(json!({ "status": "closed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, open) = app
        .get(&format!("/api/teams/hackathons/{}", hackathon), &open_captain.token)
        .await;
    let open = open.as_array().unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0]["id"], open_team);

    let (_, closed) = app
        .get(
            &format!("/api/teams/hackathons/{}?status_filter=closed", hackathon),
            &open_captain.token,
        )
        .await;
    let closed = closed.as_array().unwrap();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0]["id"], closed_team);
}

#[tokio::test]
async fn test_only_captain_can_update_team() {
    let app = TestApp::new().await;
    let hackathon = app.create_hackathon("Team Update", 4).await;
    let captain = app.login_user("Captain").await;
    let other = app.login_user("Other").await;
    let team = app.create_team(&captain, hackathon, "Before").await;

    let (status, _) = app
        .request(
            Method::PATCH,
            &format!("/api/teams/{}", team),
            Some(&other.token),
            Some(json!({ "name": "Hijacked" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .request(
            Method::PATCH,
            &format!("/api/teams/{}", team),
            Some(&captain.token),
            Some(json!({ "name": "After", "description": "renamed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "After");
    assert_eq!(body["description"], "renamed");
}

#[tokio::test]
async fn test_captain_removes_member_and_member_can_rejoin() {
    let app = TestApp::new().await;
    let hackathon = app.create_hackathon("Remove Member", 4).await;
    let captain = app.login_user("Captain").await;
    let member = app.login_user("Member").await;
    let team = app.create_team(&captain, hackathon, "Revolving Door").await;

    let invitation = app.invite(&captain, team, &member).await;
    app.post(
        &format!("/api/invitations/{}/accept", invitation),
        &member.token,
        json!({ "accept": true }),
    )
    .await;

    let (status, body) = app
        .request(
            Method::DELETE,
            &format!("/api/teams/{}/members/{}", team, member.id),
            Some(&captain.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Member removed");
    assert_eq!(app.member_ids(team, &captain.token).await, vec![captain.id]);

    let (_, detail) = app
        .get(&format!("/api/hackathons/{}", hackathon), &member.token)
        .await;
    assert!(detail["team_id"].is_null());

    // Removed members can be invited again
    let again = app.invite(&captain, team, &member).await;
    let (status, _) = app
        .post(
            &format!("/api/invitations/{}/accept", again),
            &member.token,
            json!({ "accept": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        app.member_ids(team, &captain.token).await,
        vec![captain.id, member.id]
    );
}

#[tokio::test]
async fn test_member_can_leave_but_not_remove_others() {
    let app = TestApp::new().await;
    let hackathon = app.create_hackathon("Leave Team", 4).await;
    let captain = app.login_user("Captain").await;
    let first = app.login_user("First").await;
    let second = app.login_user("Second").await;
    let team = app.create_team(&captain, hackathon, "Leavers").await;

    for user in [&first, &second] {
        let invitation = app.invite(&captain, team, user).await;
        app.post(
            &format!("/api/invitations/{}/accept", invitation),
            &user.token,
            json!({ "accept": true }),
        )
        .await;
    }

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/teams/{}/members/{}", team, second.id),
            Some(&first.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/teams/{}/members/{}", team, first.id),
            Some(&first.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        app.member_ids(team, &captain.token).await,
        vec![captain.id, second.id]
    );
}

#[tokio::test]
async fn test_captain_cannot_be_removed() {
    let app = TestApp::new().await;
    let hackathon = app.create_hackathon("Captain Stays", 4).await;
    let captain = app.login_user("Captain").await;
    let team = app.create_team(&captain, hackathon, "Anchored").await;

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/teams/{}/members/{}", team, captain.id),
            Some(&captain.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

//! Shared helpers for the HTTP integration tests.
//!
//! Every test builds its own app over a fresh in-memory SQLite database, so
//! tests never see each other's data.

#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, Ordering};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`

use hackmate::bootstrapper::create_app;
use hackmate::config::Config;
use hackmate::db::connect_with_url;
use hackmate::services::users::seed_admin;
use hackmate::state::AppState;

pub const ADMIN_EMAIL: &str = "admin@hackmate.test";
pub const ADMIN_PASSWORD: &str = "admin-password";

static NEXT_TELEGRAM_ID: AtomicI64 = AtomicI64::new(500_000);

/// Create an in-memory SQLite database with all migrations applied
pub async fn create_test_db() -> DatabaseConnection {
    connect_with_url("sqlite::memory:")
        .await
        .expect("Failed to create test database")
}

/// A logged-in participant
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: i64,
    pub telegram_id: i64,
    pub token: String,
}

pub struct TestApp {
    pub app: Router,
    pub db: DatabaseConnection,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(Config::for_tests()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let db = create_test_db().await;
        seed_admin(&db, ADMIN_EMAIL, ADMIN_PASSWORD)
            .await
            .expect("Failed to seed admin");
        let app = create_app(AppState::new(db.clone(), config));
        Self { app, db }
    }

    /// Send a raw request
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Send a JSON request and parse the JSON response (`Null` when empty)
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.send(request).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    /// Log in a new Telegram user
    pub async fn login_user(&self, full_name: &str) -> TestUser {
        let telegram_id = NEXT_TELEGRAM_ID.fetch_add(1, Ordering::SeqCst);
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/telegram",
                None,
                Some(json!({
                    "telegram_id": telegram_id,
                    "telegram_username": null,
                    "full_name": full_name,
                    "avatar_url": null,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "telegram login failed: {}", body);

        TestUser {
            id: body["user_id"].as_i64().unwrap(),
            telegram_id,
            token: body["access_token"].as_str().unwrap().to_string(),
        }
    }

    /// Token of the seeded admin
    pub async fn admin_token(&self) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/admin/login",
                None,
                Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "admin login failed: {}", body);
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Create a hackathon through the admin API and return its id
    pub async fn create_hackathon(&self, name: &str, max_team_size: i32) -> i64 {
        let admin = self.admin_token().await;
        let (status, body) = self
            .post(
                "/api/hackathons",
                &admin,
                json!({
                    "name": name,
                    "description": "integration test",
                    "start_date": "2030-05-01T09:00:00Z",
                    "end_date": "2030-05-03T18:00:00Z",
                    "max_team_size": max_team_size,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create hackathon failed: {}", body);
        body["id"].as_i64().unwrap()
    }

    pub async fn register(&self, user: &TestUser, hackathon_id: i64) {
        let (status, body) = self
            .post(
                &format!("/api/hackathons/{}/register", hackathon_id),
                &user.token,
                json!({}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {}", body);
    }

    /// Register `captain` and create a team for them
    pub async fn create_team(&self, captain: &TestUser, hackathon_id: i64, name: &str) -> i64 {
        self.register(captain, hackathon_id).await;
        let (status, body) = self
            .post(
                "/api/teams",
                &captain.token,
                json!({ "hackathon_id": hackathon_id, "name": name }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create team failed: {}", body);
        body["id"].as_i64().unwrap()
    }

    /// Captain invites `user`; returns the invitation id
    pub async fn invite(&self, captain: &TestUser, team_id: i64, user: &TestUser) -> i64 {
        let (status, body) = self
            .post(
                &format!("/api/teams/{}/invite", team_id),
                &captain.token,
                json!({ "user_id": user.id }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "invite failed: {}", body);
        body["invitation_id"].as_i64().unwrap()
    }

    /// `user` applies to a team; returns the invitation id
    pub async fn apply(&self, user: &TestUser, team_id: i64) -> i64 {
        let (status, body) = self
            .post(&format!("/api/teams/{}/apply", team_id), &user.token, json!({}))
            .await;
        assert_eq!(status, StatusCode::OK, "apply failed: {}", body);
        body["invitation_id"].as_i64().unwrap()
    }

    /// Ids of the active members of a team
    pub async fn member_ids(&self, team_id: i64, token: &str) -> Vec<i64> {
        let (status, body) = self.get(&format!("/api/teams/{}", team_id), token).await;
        assert_eq!(status, StatusCode::OK);
        body["members"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["id"].as_i64().unwrap())
            .collect()
    }
}

//! Test helpers for unit tests: an in-memory database and fixture builders.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use crate::db::connect_with_url;
use crate::models::hackathon::{self, HackathonStatus};
use crate::models::team::{self, TeamStatus};
use crate::models::team_member::{self, MemberStatus};
use crate::models::{registration, user};
use crate::services::hackathons::set_registration_team;

static NEXT_TELEGRAM_ID: AtomicI64 = AtomicI64::new(100_000);

/// Create an in-memory SQLite database with all migrations applied
pub async fn create_test_db() -> DatabaseConnection {
    connect_with_url("sqlite::memory:")
        .await
        .expect("Failed to create test database")
}

pub async fn create_user(db: &DatabaseConnection, full_name: &str) -> user::Model {
    let now = Utc::now();
    user::ActiveModel {
        telegram_id: Set(NEXT_TELEGRAM_ID.fetch_add(1, Ordering::SeqCst)),
        telegram_username: Set(None),
        full_name: Set(full_name.to_string()),
        bio: Set(None),
        skills: Set("[]".to_string()),
        role_preference: Set(None),
        experience_level: Set("junior".to_string()),
        avatar_url: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create user")
}

pub async fn create_hackathon(
    db: &DatabaseConnection,
    name: &str,
    max_team_size: i32,
) -> hackathon::Model {
    let now = Utc::now();
    hackathon::ActiveModel {
        name: Set(name.to_string()),
        description: Set(None),
        start_date: Set(now + Duration::days(1)),
        end_date: Set(now + Duration::days(3)),
        status: Set(HackathonStatus::Upcoming),
        max_team_size: Set(max_team_size),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create hackathon")
}

pub async fn register(
    db: &DatabaseConnection,
    user_id: i64,
    hackathon_id: i64,
) -> registration::Model {
    registration::ActiveModel {
        user_id: Set(user_id),
        hackathon_id: Set(hackathon_id),
        team_id: Set(None),
        registered_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to register user")
}

/// Open team with `captain_id` as captain and sole active member
pub async fn create_team(
    db: &DatabaseConnection,
    hackathon_id: i64,
    captain_id: i64,
    name: &str,
) -> team::Model {
    let now = Utc::now();
    let team = team::ActiveModel {
        hackathon_id: Set(hackathon_id),
        name: Set(name.to_string()),
        description: Set(None),
        captain_id: Set(captain_id),
        status: Set(TeamStatus::Open),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create team");

    add_member(db, &team, captain_id).await;
    team
}

/// Insert an active membership directly, bypassing capacity checks
pub async fn add_member(db: &DatabaseConnection, team: &team::Model, user_id: i64) {
    team_member::ActiveModel {
        team_id: Set(team.id),
        user_id: Set(user_id),
        status: Set(MemberStatus::Active),
        joined_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to add member");

    set_registration_team(db, user_id, team.hackathon_id, Some(team.id))
        .await
        .expect("Failed to update registration");
}

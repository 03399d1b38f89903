use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::user;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub telegram_id: i64,
    pub telegram_username: Option<String>,
    pub full_name: String,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub role_preference: Option<String>,
    pub experience_level: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserProfile {
    fn from(user: user::Model) -> Self {
        Self {
            skills: user.skills_list(),
            id: user.id,
            telegram_id: user.telegram_id,
            telegram_username: user.telegram_username,
            full_name: user.full_name,
            bio: user.bio,
            role_preference: user.role_preference,
            experience_level: user.experience_level,
            avatar_url: user.avatar_url,
            created_at: user.created_at,
        }
    }
}

/// Partial profile update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub role_preference: Option<String>,
    pub experience_level: Option<String>,
    pub avatar_url: Option<String>,
}

/// Participant card shown when looking for teammates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListItem {
    pub id: i64,
    pub full_name: String,
    pub skills: Vec<String>,
    pub role_preference: Option<String>,
    pub experience_level: String,
    pub avatar_url: Option<String>,
}

impl From<user::Model> for UserListItem {
    fn from(user: user::Model) -> Self {
        Self {
            skills: user.skills_list(),
            id: user.id,
            full_name: user.full_name,
            role_preference: user.role_preference,
            experience_level: user.experience_level,
            avatar_url: user.avatar_url,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::hackathon::{self, HackathonStatus};

fn default_max_team_size() -> i32 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateHackathonRequest {
    pub name: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default = "default_max_team_size")]
    pub max_team_size: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateHackathonRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<HackathonStatus>,
    pub max_team_size: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HackathonResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: HackathonStatus,
    pub max_team_size: i32,
    pub created_at: DateTime<Utc>,
}

impl From<hackathon::Model> for HackathonResponse {
    fn from(h: hackathon::Model) -> Self {
        Self {
            id: h.id,
            name: h.name,
            description: h.description,
            start_date: h.start_date,
            end_date: h.end_date,
            status: h.status,
            max_team_size: h.max_team_size,
            created_at: h.created_at,
        }
    }
}

/// Hackathon as seen by one participant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HackathonDetailResponse {
    #[serde(flatten)]
    pub hackathon: HackathonResponse,
    pub is_registered: bool,
    pub team_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationResponse {
    pub message: String,
    pub hackathon_id: i64,
}

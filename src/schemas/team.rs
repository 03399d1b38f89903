use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::team::{self, TeamStatus};
use crate::models::user;
use crate::schemas::UserProfile;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeamRequest {
    pub hackathon_id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTeamRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<TeamStatus>,
}

/// `?status_filter=` for the per-hackathon team list, `open` when absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamListParams {
    pub status_filter: Option<TeamStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InviteRequest {
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMemberResponse {
    pub id: i64,
    pub full_name: String,
    pub role_preference: Option<String>,
    pub skills: Vec<String>,
}

impl From<user::Model> for TeamMemberResponse {
    fn from(user: user::Model) -> Self {
        Self {
            skills: user.skills_list(),
            id: user.id,
            full_name: user.full_name,
            role_preference: user.role_preference,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamResponse {
    pub id: i64,
    pub hackathon_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub captain_id: i64,
    pub status: TeamStatus,
    pub created_at: DateTime<Utc>,
    pub members: Vec<TeamMemberResponse>,
}

impl TeamResponse {
    pub fn with_members(team: team::Model, members: Vec<user::Model>) -> Self {
        Self {
            id: team.id,
            hackathon_id: team.hackathon_id,
            name: team.name,
            description: team.description,
            captain_id: team.captain_id,
            status: team.status,
            created_at: team.created_at,
            members: members.into_iter().map(TeamMemberResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamDetailResponse {
    #[serde(flatten)]
    pub team: TeamResponse,
    pub captain: UserProfile,
}

/// Entry of "my teams", one per hackathon the user has a team in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyTeamItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub hackathon_id: i64,
    pub hackathon_name: String,
    pub status: TeamStatus,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::invitation::{InvitationKind, InvitationStatus};

/// Invitation or application, with the names a client needs to render it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationResponse {
    pub id: i64,
    pub team_id: i64,
    pub team_name: String,
    pub user_id: i64,
    pub user_name: String,
    pub sent_by_id: i64,
    pub sent_by_name: String,
    pub kind: InvitationKind,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

fn default_accept() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct RespondRequest {
    #[serde(default = "default_accept")]
    pub accept: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationActionResponse {
    pub message: String,
    pub invitation_id: i64,
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HackathonAnalytics {
    pub total_participants: u64,
    pub total_teams: u64,
    pub participants_without_team: u64,
    pub participants_in_team: u64,
    pub average_team_size: f64,
    pub skills_frequency: BTreeMap<String, u64>,
    pub experience_distribution: BTreeMap<String, u64>,
}

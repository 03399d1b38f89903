//! Per-hackathon analytics and CSV exports for admins

use std::collections::{BTreeMap, HashMap};

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

use crate::error::Result;
use crate::models::prelude::*;
use crate::models::{registration, team, user};
use crate::schemas::HackathonAnalytics;
use crate::services::{hackathons, teams};
use crate::state::DbConn;

const PARTICIPANTS_HEADER: [&str; 8] = [
    "ID",
    "Full Name",
    "Telegram Username",
    "Skills",
    "Role Preference",
    "Experience Level",
    "Team Name",
    "Team Status",
];

const TEAMS_HEADER: [&str; 6] = [
    "Team ID",
    "Team Name",
    "Team Status",
    "Captain Name",
    "Member Count",
    "Members",
];

/// Quote a field when it contains a delimiter, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_row<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = fields
        .iter()
        .map(|f| csv_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    line.push_str("\r\n");
    line
}

/// Registered users of a hackathon paired with their registration
async fn participants(
    db: &DbConn,
    hackathon_id: i64,
) -> Result<Vec<(registration::Model, user::Model)>> {
    let rows = Registration::find()
        .filter(registration::Column::HackathonId.eq(hackathon_id))
        .order_by_asc(registration::Column::UserId)
        .find_also_related(User)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(reg, user)| user.map(|u| (reg, u)))
        .collect())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub async fn hackathon_analytics(db: &DbConn, hackathon_id: i64) -> Result<HackathonAnalytics> {
    hackathons::get_hackathon(db, hackathon_id).await?;

    let participants = participants(db, hackathon_id).await?;
    let total_teams = Team::find()
        .filter(team::Column::HackathonId.eq(hackathon_id))
        .count(db)
        .await?;

    let total_participants = participants.len() as u64;
    let participants_in_team = participants
        .iter()
        .filter(|(reg, _)| reg.team_id.is_some())
        .count() as u64;

    let average_team_size = if total_teams > 0 {
        round2(total_participants as f64 / total_teams as f64)
    } else {
        0.0
    };

    let mut skills_frequency: BTreeMap<String, u64> = BTreeMap::new();
    let mut experience_distribution: BTreeMap<String, u64> = BTreeMap::new();
    for (_, user) in &participants {
        for skill in user.skills_list() {
            *skills_frequency.entry(skill).or_default() += 1;
        }
        *experience_distribution
            .entry(user.experience_level.clone())
            .or_default() += 1;
    }

    Ok(HackathonAnalytics {
        total_participants,
        total_teams,
        participants_without_team: total_participants - participants_in_team,
        participants_in_team,
        average_team_size,
        skills_frequency,
        experience_distribution,
    })
}

pub async fn export_participants_csv(db: &DbConn, hackathon_id: i64) -> Result<String> {
    hackathons::get_hackathon(db, hackathon_id).await?;

    let participants = participants(db, hackathon_id).await?;
    let teams: HashMap<i64, team::Model> = Team::find()
        .filter(team::Column::HackathonId.eq(hackathon_id))
        .all(db)
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();

    let mut out = csv_row(&PARTICIPANTS_HEADER);
    for (reg, user) in participants {
        let team = reg.team_id.and_then(|id| teams.get(&id));
        out.push_str(&csv_row(&[
            user.id.to_string(),
            user.full_name.clone(),
            user.telegram_username.clone().unwrap_or_default(),
            user.skills_list().join(", "),
            user.role_preference.clone().unwrap_or_default(),
            user.experience_level.clone(),
            team.map(|t| t.name.clone()).unwrap_or_default(),
            team.map(|t| t.status.to_string()).unwrap_or_default(),
        ]));
    }

    tracing::info!(hackathon_id, "Exported participants CSV");
    Ok(out)
}

pub async fn export_teams_csv(db: &DbConn, hackathon_id: i64) -> Result<String> {
    hackathons::get_hackathon(db, hackathon_id).await?;

    let mut out = csv_row(&TEAMS_HEADER);
    for (team, members) in teams::list_all_with_members(db, hackathon_id).await? {
        let captain = members
            .iter()
            .find(|m| m.id == team.captain_id)
            .map(|m| m.full_name.clone());
        let captain = match captain {
            Some(name) => name,
            None => User::find_by_id(team.captain_id)
                .one(db)
                .await?
                .map(|u| u.full_name)
                .unwrap_or_default(),
        };
        let names: Vec<&str> = members.iter().map(|m| m.full_name.as_str()).collect();

        out.push_str(&csv_row(&[
            team.id.to_string(),
            team.name.clone(),
            team.status.to_string(),
            captain,
            members.len().to_string(),
            names.join(", "),
        ]));
    }

    tracing::info!(hackathon_id, "Exported teams CSV");
    Ok(out)
}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A participant, identified externally by their Telegram account
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub telegram_id: i64,
    pub telegram_username: Option<String>,
    pub full_name: String,
    pub bio: Option<String>,
    /// JSON array of skill names
    pub skills: String,
    pub role_preference: Option<String>,
    pub experience_level: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::registration::Entity")]
    Registrations,
    #[sea_orm(has_many = "super::team_member::Entity")]
    TeamMemberships,
}

impl Related<super::registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registrations.def()
    }
}

impl Related<super::team_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeamMemberships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Accepted values for `experience_level`
pub const EXPERIENCE_LEVELS: [&str; 3] = ["junior", "middle", "senior"];

impl Model {
    /// Decode the stored skills list; malformed data reads as empty
    pub fn skills_list(&self) -> Vec<String> {
        serde_json::from_str(&self.skills).unwrap_or_default()
    }
}

/// Encode a skills list for storage
pub fn encode_skills(skills: &[String]) -> String {
    serde_json::to_string(skills).unwrap_or_else(|_| "[]".to_string())
}

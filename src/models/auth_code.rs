use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One-time login code handed out by the Telegram bot
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "auth_codes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub telegram_id: i64,
    pub telegram_username: Option<String>,
    pub expires_at: DateTimeUtc,
    pub is_used: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_valid(&self, now: DateTimeUtc) -> bool {
        !self.is_used && self.expires_at > now
    }
}

//! Migration: Create invitations table

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

use super::m20260301_000001_create_users::Users;
use super::m20260301_000004_create_teams::Teams;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Invitations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Invitations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Invitations::TeamId).big_integer().not_null())
                    .col(ColumnDef::new(Invitations::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Invitations::SentById).big_integer().not_null())
                    .col(ColumnDef::new(Invitations::Kind).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Invitations::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Invitations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Invitations::RespondedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Invitations::Table, Invitations::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Invitations::Table, Invitations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Invitations::Table, Invitations::SentById)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_invitations_user_status")
                    .table(Invitations::Table)
                    .col(Invitations::UserId)
                    .col(Invitations::Status)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_invitations_team_status")
                    .table(Invitations::Table)
                    .col(Invitations::TeamId)
                    .col(Invitations::Status)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // At most one pending request per (team, user). Partial indexes are
        // supported by both PostgreSQL and SQLite.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_invitations_pending_pair \
                 ON invitations (team_id, user_id) WHERE status = 'pending'",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Invitations::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
enum Invitations {
    Table,
    Id,
    #[iden = "team_id"]
    TeamId,
    #[iden = "user_id"]
    UserId,
    #[iden = "sent_by_id"]
    SentById,
    Kind,
    Status,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "responded_at"]
    RespondedAt,
}

//! Migration: Create auth_codes table (bot-issued login codes)

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuthCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuthCodes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AuthCodes::Code)
                            .string_len(16)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(AuthCodes::TelegramId).big_integer().not_null())
                    .col(ColumnDef::new(AuthCodes::TelegramUsername).string().null())
                    .col(
                        ColumnDef::new(AuthCodes::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AuthCodes::IsUsed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AuthCodes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuthCodes::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
#[iden = "auth_codes"]
enum AuthCodes {
    Table,
    Id,
    Code,
    #[iden = "telegram_id"]
    TelegramId,
    #[iden = "telegram_username"]
    TelegramUsername,
    #[iden = "expires_at"]
    ExpiresAt,
    #[iden = "is_used"]
    IsUsed,
    #[iden = "created_at"]
    CreatedAt,
}

//! Create reel table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reel::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Reel::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Reel::AuthorId).string_len(32).not_null())
                    .col(ColumnDef::new(Reel::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Reel::Description).string_len(2048).not_null())
                    .col(ColumnDef::new(Reel::Text).text().not_null())
                    .col(
                        ColumnDef::new(Reel::Likes)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(Reel::Comments)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(Reel::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Reel::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reel_author")
                            .from(Reel::Table, Reel::AuthorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: author_id
        manager
            .create_index(
                Index::create()
                    .name("idx_reel_author_id")
                    .table(Reel::Table)
                    .col(Reel::AuthorId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (newest-first listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_reel_created_at")
                    .table(Reel::Table)
                    .col(Reel::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reel::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Reel {
    Table,
    Id,
    AuthorId,
    Title,
    Description,
    Text,
    Likes,
    Comments,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use sea_orm_migration::prelude::*;

use super::m20250301_000010_create_table_user::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Blog::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Blog::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Blog::Author).uuid().not_null())
                    .col(ColumnDef::new(Blog::Title).string().not_null())
                    .col(ColumnDef::new(Blog::Slug).string().not_null().unique_key())
                    .col(ColumnDef::new(Blog::Content).text().not_null())
                    .col(ColumnDef::new(Blog::Published).boolean().not_null())
                    .col(ColumnDef::new(Blog::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Blog::DeletedAt).date_time())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-blog-author")
                            .from(Blog::Table, Blog::Author)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Blog::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Blog {
    Table,
    Id,
    Author,
    Title,
    Slug,
    Content,
    Published,
    CreatedAt,
    DeletedAt,
}

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
                    .table(Stack::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Stack::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Stack::Name).string().not_null())
                    .col(ColumnDef::new(Stack::Description).text().not_null())
                    .col(ColumnDef::new(Stack::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(Stack::CreatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-stack-created_by")
                            .from(Stack::Table, Stack::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Stack::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Stack {
    Table,
    Id,
    Name,
    Description,
    CreatedBy,
    CreatedAt,
}

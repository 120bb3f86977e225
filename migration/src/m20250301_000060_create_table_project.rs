/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use sea_orm_migration::prelude::*;

use super::m20250301_000010_create_table_user::User;
use super::m20250301_000050_create_table_stack::Stack;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Project::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Project::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Project::Owner).uuid().not_null())
                    .col(ColumnDef::new(Project::Name).string().not_null())
                    .col(ColumnDef::new(Project::Description).text().not_null())
                    .col(
                        ColumnDef::new(Project::Visibility)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Project::RemoteUrl).string().not_null())
                    .col(ColumnDef::new(Project::Secret).string())
                    .col(ColumnDef::new(Project::Stack).uuid())
                    .col(ColumnDef::new(Project::LastSyncedAt).date_time())
                    .col(ColumnDef::new(Project::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Project::DeletedAt).date_time())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-project-owner")
                            .from(Project::Table, Project::Owner)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-project-stack")
                            .from(Project::Table, Project::Stack)
                            .to(Stack::Table, Stack::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Project::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Project {
    Table,
    Id,
    Owner,
    Name,
    Description,
    Visibility,
    RemoteUrl,
    Secret,
    Stack,
    LastSyncedAt,
    CreatedAt,
    DeletedAt,
}

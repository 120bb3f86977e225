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
                    .table(StackUser::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StackUser::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StackUser::Stack).uuid().not_null())
                    .col(ColumnDef::new(StackUser::User).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-stack_user-stack")
                            .from(StackUser::Table, StackUser::Stack)
                            .to(Stack::Table, Stack::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-stack_user-user")
                            .from(StackUser::Table, StackUser::User)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StackUser::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum StackUser {
    Table,
    Id,
    Stack,
    User,
}

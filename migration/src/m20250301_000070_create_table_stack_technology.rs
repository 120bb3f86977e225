/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use sea_orm_migration::prelude::*;

use super::m20250301_000040_create_table_technology::Technology;
use super::m20250301_000050_create_table_stack::Stack;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StackTechnology::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StackTechnology::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StackTechnology::Stack).uuid().not_null())
                    .col(
                        ColumnDef::new(StackTechnology::Technology)
                            .uuid()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-stack_technology-stack")
                            .from(StackTechnology::Table, StackTechnology::Stack)
                            .to(Stack::Table, Stack::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-stack_technology-technology")
                            .from(StackTechnology::Table, StackTechnology::Technology)
                            .to(Technology::Table, Technology::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StackTechnology::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum StackTechnology {
    Table,
    Id,
    Stack,
    Technology,
}

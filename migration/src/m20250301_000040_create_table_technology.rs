/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use sea_orm_migration::prelude::*;

use super::m20250301_000030_create_table_template::Template;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Technology::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Technology::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Technology::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Technology::Description).text().not_null())
                    .col(ColumnDef::new(Technology::ImportPath).string().not_null())
                    .col(ColumnDef::new(Technology::Template).uuid())
                    .col(
                        ColumnDef::new(Technology::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-technology-template")
                            .from(Technology::Table, Technology::Template)
                            .to(Template::Table, Template::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Technology::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Technology {
    Table,
    Id,
    Name,
    Description,
    ImportPath,
    Template,
    CreatedAt,
}

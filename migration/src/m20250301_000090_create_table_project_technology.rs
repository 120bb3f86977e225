/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use sea_orm_migration::prelude::*;

use super::m20250301_000040_create_table_technology::Technology;
use super::m20250301_000060_create_table_project::Project;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProjectTechnology::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProjectTechnology::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProjectTechnology::Project)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProjectTechnology::Technology)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProjectTechnology::File).string())
                    .col(ColumnDef::new(ProjectTechnology::Line).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-project_technology-project")
                            .from(ProjectTechnology::Table, ProjectTechnology::Project)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-project_technology-technology")
                            .from(ProjectTechnology::Table, ProjectTechnology::Technology)
                            .to(Technology::Table, Technology::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProjectTechnology::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ProjectTechnology {
    Table,
    Id,
    Project,
    Technology,
    File,
    Line,
}

/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Link::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Link::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Link::GroupName).string().not_null())
                    .col(ColumnDef::new(Link::LinkType).string().not_null())
                    .col(ColumnDef::new(Link::Url).string().not_null())
                    .col(ColumnDef::new(Link::Active).boolean().not_null())
                    .col(ColumnDef::new(Link::Password).string())
                    .col(ColumnDef::new(Link::MetaTags).json_binary().not_null())
                    .col(ColumnDef::new(Link::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Link::DeletedAt).date_time())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-link-group_name-link_type")
                    .table(Link::Table)
                    .col(Link::GroupName)
                    .col(Link::LinkType)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Link::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Link {
    Table,
    Id,
    GroupName,
    LinkType,
    Url,
    Active,
    Password,
    MetaTags,
    CreatedAt,
    DeletedAt,
}

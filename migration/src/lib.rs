/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub use sea_orm_migration::prelude::*;

mod m20250301_000010_create_table_user;
mod m20250301_000020_create_table_session;
mod m20250301_000030_create_table_template;
mod m20250301_000040_create_table_technology;
mod m20250301_000050_create_table_stack;
mod m20250301_000060_create_table_project;
mod m20250301_000070_create_table_stack_technology;
mod m20250301_000080_create_table_stack_user;
mod m20250301_000090_create_table_project_technology;
mod m20250301_000100_create_table_link;
mod m20250301_000110_create_table_blog;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000010_create_table_user::Migration),
            Box::new(m20250301_000020_create_table_session::Migration),
            Box::new(m20250301_000030_create_table_template::Migration),
            Box::new(m20250301_000040_create_table_technology::Migration),
            Box::new(m20250301_000050_create_table_stack::Migration),
            Box::new(m20250301_000060_create_table_project::Migration),
            Box::new(m20250301_000070_create_table_stack_technology::Migration),
            Box::new(m20250301_000080_create_table_stack_user::Migration),
            Box::new(m20250301_000090_create_table_project_technology::Migration),
            Box::new(m20250301_000100_create_table_link::Migration),
            Box::new(m20250301_000110_create_table_blog::Migration),
        ]
    }
}

/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use anyhow::{Context, Result};
use chrono::Utc;
use migration::Migrator;
use sea_orm::{
    ColumnTrait, Condition, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder,
};
use sea_orm_migration::prelude::*;
use tracing::log::LevelFilter;
use uuid::Uuid;

use super::types::*;

pub async fn connect_db(cli: &Cli) -> Result<DatabaseConnection> {
    let db_url = if let Some(file) = &cli.database_url_file {
        std::fs::read_to_string(file).context("Failed to read database url from file")?
    } else if let Some(url) = &cli.database_url {
        url.clone()
    } else {
        anyhow::bail!("No database url provided")
    };

    let mut opt = ConnectOptions::new(db_url);

    // Only enable SQL logging at debug level
    if cli.log_level == "debug" {
        opt.sqlx_logging(true)
            .sqlx_logging_level(LevelFilter::Debug);
    } else {
        opt.sqlx_logging(false);
    }

    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(std::time::Duration::from_secs(8))
        .acquire_timeout(std::time::Duration::from_secs(8));

    let db = Database::connect(opt)
        .await
        .context("Failed to connect to database")?;
    Migrator::up(&db, None)
        .await
        .context("Failed to run database migrations")?;
    Ok(db)
}

/// The newest unexpired session for a user, whose token is used for all
/// repository-provider calls.
pub async fn get_active_session(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Option<MSession>> {
    Ok(ESession::find()
        .filter(
            Condition::all().add(CSession::User.eq(user_id)).add(
                Condition::any()
                    .add(CSession::ExpiresAt.is_null())
                    .add(CSession::ExpiresAt.gt(Utc::now().naive_utc())),
            ),
        )
        .order_by_desc(CSession::CreatedAt)
        .one(db)
        .await
        .context("Failed to query session")?)
}

/// A project owned by the given user, including soft-deleted rows.
pub async fn get_project_owned(
    db: &DatabaseConnection,
    user_id: Uuid,
    project_id: Uuid,
) -> Result<Option<MProject>> {
    Ok(EProject::find()
        .filter(
            Condition::all()
                .add(CProject::Id.eq(project_id))
                .add(CProject::Owner.eq(user_id)),
        )
        .one(db)
        .await
        .context("Failed to query project")?)
}

pub async fn get_link_by_group_and_type(
    db: &DatabaseConnection,
    group_name: &str,
    link_type: &str,
) -> Result<Option<MLink>> {
    Ok(ELink::find()
        .filter(
            Condition::all()
                .add(CLink::GroupName.eq(group_name))
                .add(CLink::LinkType.eq(link_type))
                .add(CLink::DeletedAt.is_null()),
        )
        .one(db)
        .await
        .context("Failed to query link")?)
}

pub async fn get_stack_by_id(db: &DatabaseConnection, stack_id: Uuid) -> Result<Option<MStack>> {
    Ok(EStack::find_by_id(stack_id)
        .one(db)
        .await
        .context("Failed to query stack")?)
}

/// All technologies with a non-empty import path, keyed for the scanner.
pub async fn get_scannable_technologies(db: &DatabaseConnection) -> Result<Vec<MTechnology>> {
    Ok(ETechnology::find()
        .filter(CTechnology::ImportPath.ne(""))
        .all(db)
        .await
        .context("Failed to query technologies")?)
}

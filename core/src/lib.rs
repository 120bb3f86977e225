/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod consts;
pub mod database;
pub mod github;
pub mod input;
pub mod projects;
pub mod types;

use anyhow::Result;
use clap::Parser;
use database::connect_db;
use github::GithubHost;
use std::sync::Arc;
use types::*;

pub async fn init_state() -> Result<Arc<ServerState>> {
    let cli = Cli::parse();

    tracing::info!("Starting Folio Server on {}:{}", cli.ip, cli.port);

    let db = connect_db(&cli).await?;
    let host = Arc::new(GithubHost::new(cli.github_api_url.clone()));

    Ok(Arc::new(ServerState { db, cli, host }))
}

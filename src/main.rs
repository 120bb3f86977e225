/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use app_core::init_state;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
pub async fn main() -> std::io::Result<()> {
    let filter =
        EnvFilter::try_from_env("FOLIO_LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let state = init_state().await.map_err(std::io::Error::other)?;

    scanner::start_scanner(Arc::clone(&state)).await?;
    web::serve_web(Arc::clone(&state)).await?;

    Ok(())
}

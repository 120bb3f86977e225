/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod imports;
pub mod scheduler;
pub mod tests;

use app_core::types::ServerState;
use std::sync::Arc;

pub async fn start_scanner(state: Arc<ServerState>) -> std::io::Result<()> {
    tokio::spawn(scheduler::schedule_sync_loop(Arc::clone(&state)));
    Ok(())
}

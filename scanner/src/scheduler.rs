/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use anyhow::{Context, Result};
use chrono::Utc;
use app_core::consts::SOURCE_EXTENSIONS;
use app_core::database::{get_active_session, get_scannable_technologies};
use app_core::types::*;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tracing::{error, info, instrument};
use uuid::Uuid;

use super::imports::{Construct, scan_files};

pub async fn schedule_sync_loop(state: Arc<ServerState>) {
    let mut interval = time::interval(Duration::from_secs(60));

    loop {
        interval.tick().await;

        let projects = match get_projects_needing_sync(Arc::clone(&state)).await {
            Ok(projects) => projects,
            Err(e) => {
                error!("Failed to query projects for sync: {}", e);
                continue;
            }
        };

        // One project at a time, one file at a time.
        for project in projects {
            if let Err(e) = sync_project(Arc::clone(&state), &project).await {
                error!("Failed to sync project {}: {}", project.id, e);
            }
        }
    }
}

async fn get_projects_needing_sync(state: Arc<ServerState>) -> Result<Vec<MProject>> {
    let cutoff = Utc::now().naive_utc() - chrono::Duration::seconds(state.cli.sync_interval);

    Ok(EProject::find()
        .filter(
            Condition::all().add(CProject::DeletedAt.is_null()).add(
                Condition::any()
                    .add(CProject::LastSyncedAt.is_null())
                    .add(CProject::LastSyncedAt.lt(cutoff)),
            ),
        )
        .all(&state.db)
        .await
        .context("Failed to query projects")?)
}

/// Downloads the project's source files, re-derives its technology set
/// from the import scan, and replaces the usage rows wholesale.
#[instrument(skip(state, project), fields(project_id = %project.id))]
pub async fn sync_project(
    state: Arc<ServerState>,
    project: &MProject,
) -> Result<HashMap<String, Construct>> {
    info!("Syncing project {}", project.name);

    let session = get_active_session(&state.db, project.owner)
        .await?
        .context("No active session for project owner")?;

    let technologies = get_scannable_technologies(&state.db).await?;
    let allowed: Vec<String> = technologies.iter().map(|t| t.import_path.clone()).collect();

    let files = if state
        .host
        .is_empty_repository(&session.access_token, &project.name)
        .await?
    {
        Vec::new()
    } else {
        state
            .host
            .get_files(&session.access_token, &project.name, &[String::new()])
            .await?
    };

    let files: Vec<_> = files
        .into_iter()
        .filter(|f| {
            f.path
                .rsplit('.')
                .next()
                .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
        })
        .collect();

    let scan = scan_files(&files, &allowed);

    EProjectTechnology::delete_many()
        .filter(CProjectTechnology::Project.eq(project.id))
        .exec(&state.db)
        .await?;

    let mut constructs = HashMap::new();

    for tech in &technologies {
        let usage = scan
            .iter()
            .find(|(_, u)| u.import_path == tech.import_path);

        match usage {
            Some((ident, usage)) => {
                let row = AProjectTechnology {
                    id: Set(Uuid::new_v4()),
                    project: Set(project.id),
                    technology: Set(tech.id),
                    file: Set(Some(usage.file.clone())),
                    line: Set(Some(usage.line as i32)),
                };

                row.insert(&state.db).await?;

                constructs.insert(
                    tech.name.clone(),
                    Construct::Detail {
                        id: ident.clone(),
                        file: usage.file.clone(),
                        line: usage.line,
                        href: Some(format!(
                            "{}/blob/main/{}",
                            project.remote_url, usage.file
                        )),
                    },
                );
            }
            None => {
                constructs.insert(tech.name.clone(), Construct::Flag { value: false });
            }
        }
    }

    let mut aproject: AProject = project.clone().into();
    aproject.last_synced_at = Set(Some(Utc::now().naive_utc()));
    aproject.update(&state.db).await?;

    Ok(constructs)
}

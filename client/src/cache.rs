/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use rusqlite::Connection;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

use crate::mirror::{self, Draft, DraftState};
use crate::{ApiClient, ClientError, MakeProjectRequest, ProjectResponse};

/// Offline-first view of the caller's project list. The server stays
/// authoritative: the mirror is disposable and fully rebuilt by
/// `sync_db`.
pub struct ProjectCache {
    api: ApiClient,
    conn: Mutex<Connection>,
    online: AtomicBool,
}

impl ProjectCache {
    pub fn new(api: ApiClient, conn: Connection) -> Self {
        Self {
            api,
            conn: Mutex::new(conn),
            online: AtomicBool::new(true),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Offline read of the mirror.
    pub fn projects(&self) -> Result<Vec<ProjectResponse>, ClientError> {
        Ok(mirror::list_projects(&self.conn.lock().unwrap())?)
    }

    pub fn pending_drafts(&self) -> Result<Vec<Draft>, ClientError> {
        Ok(mirror::list_drafts(&self.conn.lock().unwrap())?)
    }

    /// Optimistic create: a draft row is written locally before the API
    /// call, then either confirmed with the server's row or rolled back.
    /// There is no retry queue; a failed request surfaces its error and
    /// the caller retries.
    pub async fn add_project(
        &self,
        input: MakeProjectRequest,
    ) -> Result<ProjectResponse, ClientError> {
        if !self.is_online() {
            return Err(ClientError::Offline);
        }

        let draft_id = Uuid::new_v4().to_string();

        let draft = Draft {
            id: draft_id.clone(),
            organization: input.organization.clone(),
            name: input.name.clone(),
            description: input.description.clone(),
            visibility: input.visibility.clone(),
            state: DraftState::Draft,
            created_at: now(),
        };

        mirror::insert_draft(&self.conn.lock().unwrap(), &draft)?;

        match self.api.project_create(&input).await {
            Ok(project) => {
                let conn = self.conn.lock().unwrap();
                mirror::set_draft_state(&conn, &draft_id, DraftState::Confirmed)?;
                mirror::insert_project(&conn, &project)?;
                mirror::delete_draft(&conn, &draft_id)?;
                Ok(project)
            }
            Err(err) => {
                let conn = self.conn.lock().unwrap();
                mirror::set_draft_state(&conn, &draft_id, DraftState::RolledBack)?;
                mirror::delete_draft(&conn, &draft_id)?;
                Err(err)
            }
        }
    }

    /// Full refresh: fetches the server list and replaces the mirror
    /// wholesale. No incremental diffing, no conflict resolution.
    pub async fn sync_db(&self) -> Result<usize, ClientError> {
        if !self.is_online() {
            return Err(ClientError::Offline);
        }

        let projects = self.api.projects_all().await?;

        mirror::replace_all_projects(&mut self.conn.lock().unwrap(), &projects)?;

        Ok(projects.len())
    }
}

fn now() -> String {
    chrono::Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RequestConfig;
    use crate::mirror::open_memory_db;

    fn unreachable_cache() -> ProjectCache {
        // Nothing listens on port 9; every request fails fast.
        let api = ApiClient::new(RequestConfig {
            server_url: "http://127.0.0.1:9".to_string(),
            token: Some("test-token".to_string()),
        });

        ProjectCache::new(api, open_memory_db().unwrap())
    }

    fn demo_request() -> MakeProjectRequest {
        MakeProjectRequest {
            organization: "acme".to_string(),
            name: "demo".to_string(),
            description: "demo project".to_string(),
            visibility: "private".to_string(),
            stack: None,
        }
    }

    #[tokio::test]
    async fn test_add_project_offline_fails_fast() {
        let cache = unreachable_cache();
        cache.set_online(false);

        let err = cache.add_project(demo_request()).await.unwrap_err();

        assert!(matches!(err, ClientError::Offline));
        // Nothing was written locally.
        assert!(cache.projects().unwrap().is_empty());
        assert!(cache.pending_drafts().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sync_db_offline_fails_fast() {
        let cache = unreachable_cache();
        cache.set_online(false);

        let err = cache.sync_db().await.unwrap_err();
        assert!(matches!(err, ClientError::Offline));
    }

    #[tokio::test]
    async fn test_add_project_rolls_back_draft_on_request_failure() {
        let cache = unreachable_cache();

        let err = cache.add_project(demo_request()).await.unwrap_err();

        assert!(matches!(err, ClientError::Http(_)));
        // The draft was rolled back and removed; no confirmed row exists.
        assert!(cache.projects().unwrap().is_empty());
        assert!(cache.pending_drafts().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_token_is_surfaced_before_any_write() {
        let api = ApiClient::new(RequestConfig {
            server_url: "http://127.0.0.1:9".to_string(),
            token: None,
        });
        let cache = ProjectCache::new(api, open_memory_db().unwrap());

        let err = cache.add_project(demo_request()).await.unwrap_err();

        assert!(matches!(err, ClientError::MissingToken));
        assert!(cache.pending_drafts().unwrap().is_empty());
    }
}

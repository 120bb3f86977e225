/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use chrono::Utc;
use entity::project::Visibility;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder,
};
use std::fmt;
use uuid::Uuid;

use super::github::CreateRepository;
use super::input::check_repo_name;
use super::types::*;

#[derive(Debug)]
pub enum ProjectError {
    Validation(String),
    Provider(anyhow::Error),
    Database(DbErr),
}

impl fmt::Display for ProjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ProjectError::Provider(err) => write!(f, "Provider error: {}", err),
            ProjectError::Database(err) => write!(f, "Database error: {}", err),
        }
    }
}

impl std::error::Error for ProjectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProjectError::Validation(_) => None,
            ProjectError::Provider(err) => Some(err.as_ref()),
            ProjectError::Database(err) => Some(err),
        }
    }
}

impl From<DbErr> for ProjectError {
    fn from(err: DbErr) -> Self {
        ProjectError::Database(err)
    }
}

#[derive(Debug, Clone)]
pub struct CreateProjectInput {
    pub organization: String,
    pub name: String,
    pub description: String,
    pub visibility: Visibility,
    pub secret: Option<String>,
    pub stack: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub visibility: Option<Visibility>,
    pub owner: Option<Uuid>,
}

/// Creates the remote repository first, then mirrors its canonical
/// name, description and visibility into the local row. A failed
/// provider call leaves the database untouched.
pub async fn create(
    state: &ServerState,
    token: &str,
    owner: Uuid,
    input: CreateProjectInput,
) -> Result<MProject, ProjectError> {
    check_repo_name(&input.name).map_err(ProjectError::Validation)?;

    if input.organization.is_empty() {
        return Err(ProjectError::Validation(
            "Organization cannot be empty".to_string(),
        ));
    }

    let repo = state
        .host
        .create_repository(
            token,
            &input.organization,
            CreateRepository {
                name: input.name.clone(),
                description: input.description.clone(),
                private: input.visibility == Visibility::Private,
            },
        )
        .await
        .map_err(ProjectError::Provider)?;

    let project = AProject {
        id: Set(Uuid::new_v4()),
        owner: Set(owner),
        name: Set(repo.full_name.clone()),
        description: Set(repo.description.clone().unwrap_or(input.description)),
        visibility: Set(Visibility::from_remote(repo.private)),
        remote_url: Set(repo.html_url.clone()),
        secret: Set(input.secret),
        stack: Set(input.stack),
        last_synced_at: Set(None),
        created_at: Set(Utc::now().naive_utc()),
        deleted_at: Set(None),
    };

    Ok(project.insert(&state.db).await?)
}

/// Removes the remote repository, then the local row. If the provider
/// call fails the local row is kept so that no repository is orphaned
/// on either side.
pub async fn remove(state: &ServerState, token: &str, project: MProject) -> Result<(), ProjectError> {
    state
        .host
        .remove_repository(token, &project.name)
        .await
        .map_err(ProjectError::Provider)?;

    project.delete(&state.db).await?;

    Ok(())
}

/// Soft delete: the row is excluded from list queries but keeps its
/// history and the remote repository stays alive.
pub async fn mark_as_deleted(
    db: &DatabaseConnection,
    project: MProject,
) -> Result<MProject, DbErr> {
    let mut aproject: AProject = project.into();
    aproject.deleted_at = Set(Some(Utc::now().naive_utc()));
    aproject.update(db).await
}

/// Returns soft-deleted rows too.
pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<MProject>, DbErr> {
    EProject::find_by_id(id).one(db).await
}

pub async fn all(db: &DatabaseConnection) -> Result<Vec<MProject>, DbErr> {
    all_with_filter(db, ProjectFilter::default()).await
}

pub async fn all_by_user(db: &DatabaseConnection, owner: Uuid) -> Result<Vec<MProject>, DbErr> {
    all_with_filter(
        db,
        ProjectFilter {
            owner: Some(owner),
            ..Default::default()
        },
    )
    .await
}

pub async fn all_with_filter(
    db: &DatabaseConnection,
    filter: ProjectFilter,
) -> Result<Vec<MProject>, DbErr> {
    let mut condition = Condition::all().add(CProject::DeletedAt.is_null());

    if let Some(visibility) = filter.visibility {
        condition = condition.add(CProject::Visibility.eq(visibility));
    }

    if let Some(owner) = filter.owner {
        condition = condition.add(CProject::Owner.eq(owner));
    }

    EProject::find()
        .filter(condition)
        .order_by_desc(CProject::CreatedAt)
        .all(db)
        .await
}

/// A name is available when neither an active local row nor a remote
/// repository claims `org/name`.
pub async fn is_name_available(
    state: &ServerState,
    token: &str,
    organization: &str,
    name: &str,
) -> Result<bool, ProjectError> {
    if check_repo_name(name).is_err() {
        return Ok(false);
    }

    let full_name = format!("{}/{}", organization, name);

    let local = EProject::find()
        .filter(
            Condition::all()
                .add(CProject::Name.eq(full_name.clone()))
                .add(CProject::DeletedAt.is_null()),
        )
        .one(&state.db)
        .await?;

    if local.is_some() {
        return Ok(false);
    }

    let remote = state
        .host
        .get_repository(token, &full_name)
        .await
        .map_err(ProjectError::Provider)?;

    Ok(remote.is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{RemoteFile, RemoteOrg, RemoteRepo, RemoteUser, RepoHost};
    use anyhow::{Result, bail};
    use async_trait::async_trait;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    /// Provider stub: `Ok(repo)` answers with the canned repository,
    /// `Err` refuses every mutating call.
    struct StubHost {
        repo: Option<RemoteRepo>,
    }

    #[async_trait]
    impl RepoHost for StubHost {
        async fn create_repository(
            &self,
            _token: &str,
            _org: &str,
            _repo: CreateRepository,
        ) -> Result<RemoteRepo> {
            match &self.repo {
                Some(repo) => Ok(repo.clone()),
                None => bail!("GitHub API error 422: name already exists"),
            }
        }

        async fn remove_repository(&self, _token: &str, _full_name: &str) -> Result<()> {
            match &self.repo {
                Some(_) => Ok(()),
                None => bail!("GitHub API error 404: Not Found"),
            }
        }

        async fn get_repository(
            &self,
            _token: &str,
            _full_name: &str,
        ) -> Result<Option<RemoteRepo>> {
            Ok(self.repo.clone())
        }

        async fn get_files(
            &self,
            _token: &str,
            _full_name: &str,
            _paths: &[String],
        ) -> Result<Vec<RemoteFile>> {
            Ok(vec![])
        }

        async fn read_file_content(
            &self,
            _token: &str,
            _full_name: &str,
            _path: &str,
        ) -> Result<Vec<RemoteFile>> {
            Ok(vec![])
        }

        async fn is_empty_repository(&self, _token: &str, _full_name: &str) -> Result<bool> {
            Ok(true)
        }

        async fn list_organizations(&self, _token: &str) -> Result<Vec<RemoteOrg>> {
            Ok(vec![])
        }

        async fn get_authenticated_user(&self, _token: &str) -> Result<RemoteUser> {
            Ok(RemoteUser {
                login: "acme".to_string(),
                name: None,
                email: None,
            })
        }
    }

    fn mock_cli() -> Cli {
        Cli {
            log_level: "info".to_string(),
            ip: "127.0.0.1".to_string(),
            port: 3000,
            serve_url: "http://127.0.0.1:8000".to_string(),
            database_url: Some("mock://test".to_string()),
            database_url_file: None,
            jwt_secret_file: "test_jwt".to_string(),
            disable_registration: false,
            oauth_enabled: false,
            oauth_required: false,
            oauth_client_id: None,
            oauth_client_secret_file: None,
            oauth_authorize_url: "https://github.com/login/oauth/authorize".to_string(),
            oauth_token_url: "https://github.com/login/oauth/access_token".to_string(),
            github_api_url: "https://api.github.com".to_string(),
            link_fallback_url: "/404".to_string(),
            sync_interval: 3600,
        }
    }

    fn demo_repo() -> RemoteRepo {
        RemoteRepo {
            full_name: "acme/demo".to_string(),
            owner: "acme".to_string(),
            name: "demo".to_string(),
            description: Some("demo project".to_string()),
            html_url: "https://github.com/acme/demo".to_string(),
            private: true,
            default_branch: "main".to_string(),
        }
    }

    fn demo_project() -> MProject {
        MProject {
            id: Uuid::new_v4(),
            owner: Uuid::new_v4(),
            name: "acme/demo".to_string(),
            description: "demo project".to_string(),
            visibility: Visibility::Private,
            remote_url: "https://github.com/acme/demo".to_string(),
            secret: None,
            stack: None,
            last_synced_at: None,
            created_at: Utc::now().naive_utc(),
            deleted_at: None,
        }
    }

    fn demo_input() -> CreateProjectInput {
        CreateProjectInput {
            organization: "acme".to_string(),
            name: "demo".to_string(),
            description: "demo project".to_string(),
            visibility: Visibility::Private,
            secret: None,
            stack: None,
        }
    }

    #[tokio::test]
    async fn test_create_derives_row_from_remote() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![demo_project()]])
            .into_connection();

        let state = ServerState {
            db,
            cli: mock_cli(),
            host: Arc::new(StubHost {
                repo: Some(demo_repo()),
            }),
        };

        let project = create(&state, "token", Uuid::new_v4(), demo_input())
            .await
            .unwrap();

        assert_eq!(project.name, "acme/demo");
        assert_eq!(project.visibility, Visibility::Private);
        assert_eq!(project.remote_url, "https://github.com/acme/demo");

        // The insert carries the remote's canonical values.
        let log = format!("{:?}", state.db.into_transaction_log());
        assert!(log.contains("acme/demo"));
        assert!(log.contains("https://github.com/acme/demo"));
    }

    #[tokio::test]
    async fn test_create_remote_failure_inserts_no_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let state = ServerState {
            db,
            cli: mock_cli(),
            host: Arc::new(StubHost { repo: None }),
        };

        let err = create(&state, "token", Uuid::new_v4(), demo_input())
            .await
            .unwrap_err();

        assert!(matches!(err, ProjectError::Provider(_)));
        assert!(state.db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_name() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let state = ServerState {
            db,
            cli: mock_cli(),
            host: Arc::new(StubHost {
                repo: Some(demo_repo()),
            }),
        };

        let mut input = demo_input();
        input.name = "bad name".to_string();

        let err = create(&state, "token", Uuid::new_v4(), input)
            .await
            .unwrap_err();

        assert!(matches!(err, ProjectError::Validation(_)));
        assert!(state.db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_remove_deletes_row_after_remote() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let state = ServerState {
            db,
            cli: mock_cli(),
            host: Arc::new(StubHost {
                repo: Some(demo_repo()),
            }),
        };

        remove(&state, "token", demo_project()).await.unwrap();

        let log = state.db.into_transaction_log();
        assert_eq!(log.len(), 1);
        assert!(format!("{:?}", log).contains("DELETE"));
    }

    #[tokio::test]
    async fn test_remove_remote_failure_keeps_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let state = ServerState {
            db,
            cli: mock_cli(),
            host: Arc::new(StubHost { repo: None }),
        };

        let err = remove(&state, "token", demo_project()).await.unwrap_err();

        assert!(matches!(err, ProjectError::Provider(_)));
        // No DELETE was issued.
        assert!(state.db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_all_with_filter_excludes_deleted_and_private() {
        let public = MProject {
            visibility: Visibility::Public,
            ..demo_project()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![public.clone()]])
            .into_connection();

        let rows = all_with_filter(
            &db,
            ProjectFilter {
                visibility: Some(Visibility::Public),
                owner: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(rows, vec![public]);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("deleted_at"));
        assert!(log.contains("visibility"));
    }

    #[tokio::test]
    async fn test_mark_as_deleted_sets_timestamp() {
        let deleted = MProject {
            deleted_at: Some(Utc::now().naive_utc()),
            ..demo_project()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![deleted.clone()]])
            .into_connection();

        let project = mark_as_deleted(&db, demo_project()).await.unwrap();
        assert!(project.deleted_at.is_some());

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("UPDATE"));
    }

    #[tokio::test]
    async fn test_find_by_id_returns_soft_deleted() {
        let deleted = MProject {
            deleted_at: Some(Utc::now().naive_utc()),
            ..demo_project()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![deleted.clone()]])
            .into_connection();

        let found = find_by_id(&db, deleted.id).await.unwrap();
        assert_eq!(found, Some(deleted));

        // No deleted_at filter on direct lookup.
        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("deleted_at\" IS NULL"));
    }
}

/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

#[cfg(test)]
mod tests {
    use crate::imports::{Construct, scan_file, scan_files};
    use crate::scheduler::sync_project;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::Utc;
    use app_core::github::{
        CreateRepository, RemoteFile, RemoteOrg, RemoteRepo, RemoteUser, RepoHost,
    };
    use app_core::types::*;
    use entity::project::Visibility;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;
    use uuid::Uuid;

    fn sdk_file(path: &str) -> RemoteFile {
        RemoteFile {
            path: path.to_string(),
            content: concat!(
                "import { Api } from \"@folio/sdk\";\n",
                "import { useState } from \"react\";\n",
                "\n",
                "const api = new Api({ token });\n",
                "export const projects = await api.list();\n",
            )
            .to_string(),
        }
    }

    #[test]
    fn test_scan_records_import_and_references() {
        let file = sdk_file("src/api.ts");
        let allowed = vec!["@folio/sdk".to_string()];

        let result = scan_files(std::slice::from_ref(&file), &allowed);

        let usage = result.get("Api").expect("Api should be detected");
        assert_eq!(usage.line, 1);
        assert_eq!(usage.file, "src/api.ts");
        assert_eq!(usage.import_statement, "import { Api } from \"@folio/sdk\";");
        assert!(!usage.code.is_empty());
        assert!(usage.code[0].code.contains("new Api"));
        assert_eq!(usage.code[0].line, 4);
    }

    #[test]
    fn test_scan_ignores_unlisted_module_paths() {
        let file = sdk_file("src/unlisted.ts");
        let allowed = vec!["@folio/sdk".to_string()];

        let result = scan_files(std::slice::from_ref(&file), &allowed);

        // `useState` comes from react, which is not allow-listed.
        assert!(!result.contains_key("useState"));
    }

    #[test]
    fn test_scan_handles_aliased_imports() {
        let file = RemoteFile {
            path: "src/alias.ts".to_string(),
            content: concat!(
                "import { Api as Client } from \"@folio/sdk\";\n",
                "const c = new Client();\n",
            )
            .to_string(),
        };

        let result = scan_file(&file, &["@folio/sdk".to_string()]);

        let usage = result.get("Client").expect("alias should be detected");
        assert_eq!(usage.code.len(), 1);
        assert_eq!(usage.code[0].line, 2);
    }

    #[test]
    fn test_scan_does_not_match_substrings() {
        let file = RemoteFile {
            path: "src/substring.ts".to_string(),
            content: concat!(
                "import { Api } from \"@folio/sdk\";\n",
                "const ApiGateway = other();\n",
                "const x = Api.call();\n",
            )
            .to_string(),
        };

        let result = scan_file(&file, &["@folio/sdk".to_string()]);

        let usage = result.get("Api").unwrap();
        assert_eq!(usage.code.len(), 1);
        assert_eq!(usage.code[0].line, 3);
    }

    #[test]
    fn test_scan_is_memoized_per_path() {
        let first = RemoteFile {
            path: "src/memo.ts".to_string(),
            content: "import { Api } from \"@folio/sdk\";\nApi.call();\n".to_string(),
        };

        let result = scan_file(&first, &["@folio/sdk".to_string()]);
        assert!(result.contains_key("Api"));

        // Same path with different content returns the cached result
        // until restart.
        let changed = RemoteFile {
            path: "src/memo.ts".to_string(),
            content: String::new(),
        };

        let cached = scan_file(&changed, &["@folio/sdk".to_string()]);
        assert_eq!(cached, result);
    }

    struct FilesHost {
        files: Vec<RemoteFile>,
    }

    #[async_trait]
    impl RepoHost for FilesHost {
        async fn create_repository(
            &self,
            _token: &str,
            _org: &str,
            _repo: CreateRepository,
        ) -> Result<RemoteRepo> {
            anyhow::bail!("not wired in tests")
        }

        async fn remove_repository(&self, _token: &str, _full_name: &str) -> Result<()> {
            anyhow::bail!("not wired in tests")
        }

        async fn get_repository(
            &self,
            _token: &str,
            _full_name: &str,
        ) -> Result<Option<RemoteRepo>> {
            Ok(None)
        }

        async fn get_files(
            &self,
            _token: &str,
            _full_name: &str,
            _paths: &[String],
        ) -> Result<Vec<RemoteFile>> {
            Ok(self.files.clone())
        }

        async fn read_file_content(
            &self,
            _token: &str,
            _full_name: &str,
            _path: &str,
        ) -> Result<Vec<RemoteFile>> {
            Ok(self.files.clone())
        }

        async fn is_empty_repository(&self, _token: &str, _full_name: &str) -> Result<bool> {
            Ok(self.files.is_empty())
        }

        async fn list_organizations(&self, _token: &str) -> Result<Vec<RemoteOrg>> {
            Ok(vec![])
        }

        async fn get_authenticated_user(&self, _token: &str) -> Result<RemoteUser> {
            anyhow::bail!("not wired in tests")
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

    #[tokio::test]
    async fn test_sync_project_rederives_technology_stack() {
        let owner = Uuid::new_v4();
        let project = MProject {
            id: Uuid::new_v4(),
            owner,
            name: "acme/demo".to_string(),
            description: "demo project".to_string(),
            visibility: Visibility::Public,
            remote_url: "https://github.com/acme/demo".to_string(),
            secret: None,
            stack: None,
            last_synced_at: None,
            created_at: Utc::now().naive_utc(),
            deleted_at: None,
        };

        let session = MSession {
            id: Uuid::new_v4(),
            user: owner,
            access_token: "gh-token".to_string(),
            refresh_token: None,
            expires_at: None,
            created_at: Utc::now().naive_utc(),
        };

        let technology = MTechnology {
            id: Uuid::new_v4(),
            name: "folio-sdk".to_string(),
            description: "".to_string(),
            import_path: "@folio/sdk".to_string(),
            template: None,
            created_at: Utc::now().naive_utc(),
        };

        let usage_row = MProjectTechnology {
            id: Uuid::new_v4(),
            project: project.id,
            technology: technology.id,
            file: Some("sync.ts".to_string()),
            line: Some(1),
        };

        let synced_project = MProject {
            last_synced_at: Some(Utc::now().naive_utc()),
            ..project.clone()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![session]])
            .append_query_results([vec![technology]])
            .append_query_results([vec![usage_row]])
            .append_query_results([vec![synced_project]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let state = Arc::new(ServerState {
            db,
            cli: mock_cli(),
            host: Arc::new(FilesHost {
                files: vec![RemoteFile {
                    path: "sync.ts".to_string(),
                    content: "import { Api } from \"@folio/sdk\";\nApi.list();\n".to_string(),
                }],
            }),
        });

        let constructs = sync_project(Arc::clone(&state), &project).await.unwrap();

        match constructs.get("folio-sdk").unwrap() {
            Construct::Detail { id, file, line, .. } => {
                assert_eq!(id, "Api");
                assert_eq!(file, "sync.ts");
                assert_eq!(*line, 1);
            }
            other => panic!("expected detailed construct, got {:?}", other),
        }
    }

    #[test]
    fn test_construct_serializes_with_kind_discriminant() {
        let flag = Construct::Flag { value: false };
        let json = serde_json::to_value(&flag).unwrap();
        assert_eq!(json["kind"], "flag");

        let detail = Construct::Detail {
            id: "Api".to_string(),
            file: "src/api.ts".to_string(),
            line: 1,
            href: None,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["kind"], "construct");
        assert_eq!(json["line"], 1);
    }
}

/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

#[cfg(test)]
mod tests {
    use crate::app;
    use anyhow::Result;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chrono::Utc;
    use app_core::github::{
        CreateRepository, RemoteFile, RemoteOrg, RemoteRepo, RemoteUser, RepoHost,
    };
    use app_core::types::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    struct NullHost;

    #[async_trait]
    impl RepoHost for NullHost {
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
            anyhow::bail!("not wired in tests")
        }
    }

    fn create_mock_cli() -> Cli {
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

    fn create_state_with_links(links: Vec<MLink>) -> Arc<ServerState> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([links])
            .into_connection();

        Arc::new(ServerState {
            db,
            cli: create_mock_cli(),
            host: Arc::new(NullHost),
        })
    }

    fn promo_link(active: bool) -> MLink {
        MLink {
            id: Uuid::new_v4(),
            group_name: "promo".to_string(),
            link_type: "launch".to_string(),
            url: "https://example.com/launch".to_string(),
            active,
            password: None,
            meta_tags: serde_json::Value::Null,
            created_at: Utc::now().naive_utc(),
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn test_link_redirect_follows_active_link() {
        let state = create_state_with_links(vec![promo_link(true)]);

        let res = app(state)
            .oneshot(
                Request::builder()
                    .uri("/link/promo?type=launch")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers().get(header::LOCATION).unwrap(),
            "https://example.com/launch"
        );
    }

    #[tokio::test]
    async fn test_link_redirect_inactive_goes_to_fallback() {
        let state = create_state_with_links(vec![promo_link(false)]);

        let res = app(state)
            .oneshot(
                Request::builder()
                    .uri("/link/promo?type=launch")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/404");
    }

    #[tokio::test]
    async fn test_link_redirect_unknown_goes_to_fallback() {
        let state = create_state_with_links(vec![]);

        let res = app(state)
            .oneshot(
                Request::builder()
                    .uri("/link/promo?type=launch")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/404");
    }

    #[tokio::test]
    async fn test_link_redirect_requires_type_param() {
        let state = create_state_with_links(vec![promo_link(true)]);

        let res = app(state)
            .oneshot(
                Request::builder()
                    .uri("/link/promo")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_link_redirect_wrong_password_goes_to_fallback() {
        let mut link = promo_link(true);
        link.password = Some("hunter2".to_string());
        let state = create_state_with_links(vec![link]);

        let res = app(state)
            .oneshot(
                Request::builder()
                    .uri("/link/promo?type=launch&password=wrong")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/404");
    }

    #[tokio::test]
    async fn test_authenticated_routes_reject_missing_header() {
        let state = create_state_with_links(vec![]);

        let res = app(state)
            .oneshot(
                Request::builder()
                    .uri("/projects/all")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let state = create_state_with_links(vec![]);

        let res = app(state)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
    }

    mod request_serialization {
        use crate::endpoints::auth::{MakeLoginRequest, MakeUserRequest};
        use crate::endpoints::projects::MakeProjectRequest;

        #[test]
        fn test_make_project_request_serialization() {
            let request = MakeProjectRequest {
                organization: "acme".to_string(),
                name: "demo".to_string(),
                description: "demo project".to_string(),
                visibility: "private".to_string(),
                secret: None,
                stack: None,
            };

            let json = serde_json::to_string(&request).unwrap();
            assert!(json.contains("acme"));
            assert!(json.contains("demo"));
            assert!(json.contains("private"));
        }

        #[test]
        fn test_make_login_request_serialization() {
            let request = MakeLoginRequest {
                loginname: "testuser".to_string(),
                password: "password123".to_string(),
            };

            let json = serde_json::to_string(&request).unwrap();
            assert!(json.contains("testuser"));
            assert!(json.contains("password123"));
        }

        #[test]
        fn test_make_user_request_serialization() {
            let request = MakeUserRequest {
                username: "testuser".to_string(),
                name: "Test User".to_string(),
                email: "test@example.com".to_string(),
                password: "password123".to_string(),
            };

            let json = serde_json::to_string(&request).unwrap();
            assert!(json.contains("testuser"));
            assert!(json.contains("Test User"));
            assert!(json.contains("test@example.com"));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::project::{self, Visibility};
    use crate::user;
    use chrono::NaiveDate;
    use sea_orm::{DatabaseBackend, EntityTrait, MockDatabase};
    use uuid::Uuid;

    fn test_time() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_visibility_serde() {
        assert_eq!(
            serde_json::to_string(&Visibility::Public).unwrap(),
            "\"public\""
        );
        assert_eq!(
            serde_json::from_str::<Visibility>("\"private\"").unwrap(),
            Visibility::Private
        );
        assert!("internal".parse::<Visibility>().is_err());
    }

    #[test]
    fn test_visibility_from_remote() {
        assert_eq!(Visibility::from_remote(true), Visibility::Private);
        assert_eq!(Visibility::from_remote(false), Visibility::Public);
    }

    #[tokio::test]
    async fn test_find_project() {
        let project = project::Model {
            id: Uuid::new_v4(),
            owner: Uuid::new_v4(),
            name: "acme/demo".to_string(),
            description: "demo project".to_string(),
            visibility: Visibility::Private,
            remote_url: "https://github.com/acme/demo".to_string(),
            secret: None,
            stack: None,
            last_synced_at: None,
            created_at: test_time(),
            deleted_at: None,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![project.clone()]])
            .into_connection();

        assert_eq!(
            project::Entity::find().one(&db).await.unwrap(),
            Some(project)
        );
    }

    #[test]
    fn test_user_debug_redacts_password() {
        let user = user::Model {
            id: Uuid::new_v4(),
            username: "jane".to_string(),
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password: Some("hash".to_string()),
            email_verified: true,
            last_login_at: test_time(),
            created_at: test_time(),
            deleted_at: None,
        };

        let rendered = format!("{:?}", user);
        assert!(rendered.contains("[redacted]"));
        assert!(!rendered.contains("hash"));
    }
}

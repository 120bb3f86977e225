/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use chrono::NaiveDate;
use entity::project::{self, Visibility};
use uuid::Uuid;

fn demo_project() -> project::Model {
    project::Model {
        id: Uuid::new_v4(),
        owner: Uuid::new_v4(),
        name: "acme/demo".to_string(),
        description: "demo project".to_string(),
        visibility: Visibility::Private,
        remote_url: "https://github.com/acme/demo".to_string(),
        secret: None,
        stack: None,
        last_synced_at: None,
        created_at: NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap(),
        deleted_at: None,
    }
}

#[test]
fn test_project_serializes_visibility_lowercase() {
    let json = serde_json::to_value(demo_project()).unwrap();
    assert_eq!(json["visibility"], "private");
    assert_eq!(json["name"], "acme/demo");
}

#[test]
fn test_project_round_trips_through_json() {
    let project = demo_project();
    let json = serde_json::to_string(&project).unwrap();
    let parsed: project::Model = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, project);
}

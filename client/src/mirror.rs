/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use rusqlite::{Connection, Row, params};
use std::path::Path;

use crate::ProjectResponse;

const CREATE_PROJECTS: &str = "
CREATE TABLE IF NOT EXISTS projects (
    id              TEXT PRIMARY KEY,
    owner           TEXT NOT NULL,
    name            TEXT NOT NULL,
    description     TEXT NOT NULL,
    visibility      TEXT NOT NULL,
    remote_url      TEXT NOT NULL,
    last_synced_at  TEXT,
    created_at      TEXT NOT NULL
)";

const CREATE_CREATE_PROJECTS: &str = "
CREATE TABLE IF NOT EXISTS create_projects (
    id            TEXT PRIMARY KEY,
    organization  TEXT NOT NULL,
    name          TEXT NOT NULL,
    description   TEXT NOT NULL,
    visibility    TEXT NOT NULL,
    state         TEXT NOT NULL,
    created_at    TEXT NOT NULL
)";

const CREATE_SESSIONS: &str = "
CREATE TABLE IF NOT EXISTS sessions (
    id          TEXT PRIMARY KEY,
    token       TEXT NOT NULL,
    created_at  TEXT NOT NULL
)";

const CREATE_INDEXES: &str = "
CREATE INDEX IF NOT EXISTS idx_projects_name ON projects(name);
CREATE INDEX IF NOT EXISTS idx_create_projects_state ON create_projects(state);
";

/// Open (or create) the local mirror at the given path.
pub fn open_db(path: &Path) -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    run_migrations(&conn)?;
    Ok(conn)
}

/// Open an in-memory mirror for testing.
pub fn open_memory_db() -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open_in_memory()?;
    run_migrations(&conn)?;
    Ok(conn)
}

fn run_migrations(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(CREATE_PROJECTS)?;
    conn.execute_batch(CREATE_CREATE_PROJECTS)?;
    conn.execute_batch(CREATE_SESSIONS)?;
    conn.execute_batch(CREATE_INDEXES)?;
    Ok(())
}

/// Lifecycle of an optimistic local write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftState {
    Draft,
    Confirmed,
    RolledBack,
}

impl DraftState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftState::Draft => "draft",
            DraftState::Confirmed => "confirmed",
            DraftState::RolledBack => "rolled_back",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub id: String,
    pub organization: String,
    pub name: String,
    pub description: String,
    pub visibility: String,
    pub state: DraftState,
    pub created_at: String,
}

fn row_to_project(row: &Row) -> Result<ProjectResponse, rusqlite::Error> {
    Ok(ProjectResponse {
        id: row.get(0)?,
        owner: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        visibility: row.get(4)?,
        remote_url: row.get(5)?,
        last_synced_at: row.get(6)?,
        created_at: row.get(7)?,
    })
}

pub fn insert_project(
    conn: &Connection,
    project: &ProjectResponse,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT OR REPLACE INTO projects
         (id, owner, name, description, visibility, remote_url, last_synced_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            project.id,
            project.owner,
            project.name,
            project.description,
            project.visibility,
            project.remote_url,
            project.last_synced_at,
            project.created_at,
        ],
    )?;
    Ok(())
}

pub fn list_projects(conn: &Connection) -> Result<Vec<ProjectResponse>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT id, owner, name, description, visibility, remote_url, last_synced_at, created_at
         FROM projects ORDER BY created_at DESC",
    )?;
    let rows = stmt.query_map([], |row| row_to_project(row))?;
    rows.collect()
}

/// Wholesale replace of the confirmed mirror. Pending drafts in
/// `create_projects` are left alone; only their own confirm or rollback
/// transition removes them.
pub fn replace_all_projects(
    conn: &mut Connection,
    projects: &[ProjectResponse],
) -> Result<(), rusqlite::Error> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM projects", [])?;

    for project in projects {
        tx.execute(
            "INSERT INTO projects
             (id, owner, name, description, visibility, remote_url, last_synced_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                project.id,
                project.owner,
                project.name,
                project.description,
                project.visibility,
                project.remote_url,
                project.last_synced_at,
                project.created_at,
            ],
        )?;
    }

    tx.commit()
}

pub fn insert_draft(conn: &Connection, draft: &Draft) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO create_projects
         (id, organization, name, description, visibility, state, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            draft.id,
            draft.organization,
            draft.name,
            draft.description,
            draft.visibility,
            draft.state.as_str(),
            draft.created_at,
        ],
    )?;
    Ok(())
}

pub fn set_draft_state(
    conn: &Connection,
    id: &str,
    state: DraftState,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        "UPDATE create_projects SET state = ?1 WHERE id = ?2",
        params![state.as_str(), id],
    )?;
    Ok(())
}

pub fn delete_draft(conn: &Connection, id: &str) -> Result<(), rusqlite::Error> {
    conn.execute("DELETE FROM create_projects WHERE id = ?1", params![id])?;
    Ok(())
}

pub fn list_drafts(conn: &Connection) -> Result<Vec<Draft>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT id, organization, name, description, visibility, state, created_at
         FROM create_projects ORDER BY created_at",
    )?;
    let rows = stmt.query_map([], |row| {
        let state: String = row.get(5)?;
        Ok(Draft {
            id: row.get(0)?,
            organization: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            visibility: row.get(4)?,
            state: match state.as_str() {
                "confirmed" => DraftState::Confirmed,
                "rolled_back" => DraftState::RolledBack,
                _ => DraftState::Draft,
            },
            created_at: row.get(6)?,
        })
    })?;
    rows.collect()
}

pub fn insert_session(
    conn: &Connection,
    id: &str,
    token: &str,
    created_at: &str,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT OR REPLACE INTO sessions (id, token, created_at) VALUES (?1, ?2, ?3)",
        params![id, token, created_at],
    )?;
    Ok(())
}

pub fn latest_session_token(conn: &Connection) -> Result<Option<String>, rusqlite::Error> {
    let mut stmt =
        conn.prepare("SELECT token FROM sessions ORDER BY created_at DESC LIMIT 1")?;
    let mut rows = stmt.query([])?;
    match rows.next()? {
        Some(row) => Ok(Some(row.get(0)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str, name: &str) -> ProjectResponse {
        ProjectResponse {
            id: id.to_string(),
            owner: "user-1".to_string(),
            name: name.to_string(),
            description: "".to_string(),
            visibility: "public".to_string(),
            remote_url: format!("https://github.com/{}", name),
            last_synced_at: None,
            created_at: "2025-03-01T12:00:00".to_string(),
        }
    }

    #[test]
    fn test_project_round_trip() {
        let conn = open_memory_db().unwrap();
        let row = project("p1", "acme/demo");

        insert_project(&conn, &row).unwrap();
        assert_eq!(list_projects(&conn).unwrap(), vec![row]);
    }

    #[test]
    fn test_replace_all_is_set_equal_to_input() {
        let mut conn = open_memory_db().unwrap();

        insert_project(&conn, &project("old", "acme/old")).unwrap();

        let fresh = vec![project("p1", "acme/one"), project("p2", "acme/two")];
        replace_all_projects(&mut conn, &fresh).unwrap();

        let mut got: Vec<String> = list_projects(&conn)
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        got.sort();

        assert_eq!(got, vec!["p1".to_string(), "p2".to_string()]);
    }

    #[test]
    fn test_replace_all_keeps_pending_drafts() {
        let mut conn = open_memory_db().unwrap();

        let draft = Draft {
            id: "d1".to_string(),
            organization: "acme".to_string(),
            name: "pending".to_string(),
            description: "".to_string(),
            visibility: "private".to_string(),
            state: DraftState::Draft,
            created_at: "2025-03-01T12:00:00".to_string(),
        };

        insert_draft(&conn, &draft).unwrap();
        replace_all_projects(&mut conn, &[project("p1", "acme/one")]).unwrap();

        // A racing resync must not discard the in-flight draft.
        assert_eq!(list_drafts(&conn).unwrap(), vec![draft]);
    }

    #[test]
    fn test_draft_state_transitions() {
        let conn = open_memory_db().unwrap();

        let draft = Draft {
            id: "d1".to_string(),
            organization: "acme".to_string(),
            name: "demo".to_string(),
            description: "".to_string(),
            visibility: "public".to_string(),
            state: DraftState::Draft,
            created_at: "2025-03-01T12:00:00".to_string(),
        };

        insert_draft(&conn, &draft).unwrap();
        set_draft_state(&conn, "d1", DraftState::RolledBack).unwrap();

        assert_eq!(list_drafts(&conn).unwrap()[0].state, DraftState::RolledBack);

        delete_draft(&conn, "d1").unwrap();
        assert!(list_drafts(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_latest_session_token() {
        let conn = open_memory_db().unwrap();

        assert_eq!(latest_session_token(&conn).unwrap(), None);

        insert_session(&conn, "s1", "old-token", "2025-03-01T10:00:00").unwrap();
        insert_session(&conn, "s2", "new-token", "2025-03-01T11:00:00").unwrap();

        assert_eq!(
            latest_session_token(&conn).unwrap(),
            Some("new-token".to_string())
        );
    }
}

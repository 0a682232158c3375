//! Design-iteration repository — append-only child rows of a session.
//!
//! Rows are never updated or deleted. [`IterationRepo::exists`] is the
//! dedup check the gateway runs before each insert.

use rusqlite::{Connection, params};
use uuid::Uuid;

use crate::errors::Result;
use crate::sqlite::row_types::IterationRow;

/// Iteration repository — stateless, every method takes `&Connection`.
pub struct IterationRepo;

impl IterationRepo {
    /// Insert a new iteration row.
    pub fn insert(
        conn: &Connection,
        session_id: &str,
        problem_statement: &str,
        solution: &str,
        features: &[String],
    ) -> Result<IterationRow> {
        let id = format!("iter_{}", Uuid::now_v7());
        let now = chrono::Utc::now().to_rfc3339();
        let features_json =
            serde_json::to_string(features).unwrap_or_else(|_| "[]".to_owned());

        let _ = conn.execute(
            "INSERT INTO design_iterations (id, session_id, problem_statement, solution, features, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![id, session_id, problem_statement, solution, features_json, now],
        )?;

        Ok(IterationRow {
            id,
            session_id: session_id.to_owned(),
            problem_statement: problem_statement.to_owned(),
            solution: solution.to_owned(),
            features: features_json,
            created_at: now,
        })
    }

    /// Whether an iteration with this exact `(problem_statement, solution)`
    /// pair already exists for the session.
    pub fn exists(
        conn: &Connection,
        session_id: &str,
        problem_statement: &str,
        solution: &str,
    ) -> Result<bool> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(
               SELECT 1 FROM design_iterations
               WHERE session_id = ?1 AND problem_statement = ?2 AND solution = ?3
             )",
            params![session_id, problem_statement, solution],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// List a session's iterations in insertion order.
    pub fn list_for_session(conn: &Connection, session_id: &str) -> Result<Vec<IterationRow>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM design_iterations WHERE session_id = ?1 ORDER BY created_at, rowid",
        )?;
        let rows = stmt
            .query_map(params![session_id], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<IterationRow> {
        Ok(IterationRow {
            id: row.get("id")?,
            session_id: row.get("session_id")?,
            problem_statement: row.get("problem_statement")?,
            solution: row.get("solution")?,
            features: row.get("features")?,
            created_at: row.get("created_at")?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! Clarity-capsule repository — the terminal, write-once artifact.
//!
//! The table carries a unique index on `session_id`; a second insert for the
//! same session fails at the store level, not just in orchestration logic.

use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use atelier_core::session::ClarityCapsule;

use crate::errors::Result;
use crate::sqlite::row_types::CapsuleRow;

/// Capsule repository — stateless, every method takes `&Connection`.
pub struct CapsuleRepo;

impl CapsuleRepo {
    /// Insert the capsule for a session. Fails if one already exists.
    pub fn insert(
        conn: &Connection,
        session_id: &str,
        capsule: &ClarityCapsule,
    ) -> Result<CapsuleRow> {
        let id = format!("cap_{}", Uuid::now_v7());
        let now = chrono::Utc::now().to_rfc3339();
        let strengths = serde_json::to_string(&capsule.strengths)?;
        let blind_spots = serde_json::to_string(&capsule.blind_spots)?;
        let next_steps = serde_json::to_string(&capsule.next_steps)?;

        let _ = conn.execute(
            "INSERT INTO clarity_capsules (id, session_id, problem_statement, solution_concept,
             strengths, blind_spots, next_steps, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id,
                session_id,
                capsule.problem_statement,
                capsule.solution_concept,
                strengths,
                blind_spots,
                next_steps,
                now,
            ],
        )?;

        Ok(CapsuleRow {
            id,
            session_id: session_id.to_owned(),
            problem_statement: capsule.problem_statement.clone(),
            solution_concept: capsule.solution_concept.clone(),
            strengths,
            blind_spots,
            next_steps,
            created_at: now,
        })
    }

    /// Get the capsule for a session, if generated.
    pub fn get_for_session(conn: &Connection, session_id: &str) -> Result<Option<CapsuleRow>> {
        let row = conn
            .query_row(
                "SELECT * FROM clarity_capsules WHERE session_id = ?1",
                params![session_id],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CapsuleRow> {
        Ok(CapsuleRow {
            id: row.get("id")?,
            session_id: row.get("session_id")?,
            problem_statement: row.get("problem_statement")?,
            solution_concept: row.get("solution_concept")?,
            strengths: row.get("strengths")?,
            blind_spots: row.get("blind_spots")?,
            next_steps: row.get("next_steps")?,
            created_at: row.get("created_at")?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

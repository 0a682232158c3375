//! Feedback repository — append-only child rows of a session.
//!
//! The payload column is opaque JSON. Dedup compares the parsed value, not
//! the raw text, so key ordering differences do not defeat it.

use rusqlite::{Connection, params};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::Result;
use crate::sqlite::row_types::FeedbackRow;

/// Feedback repository — stateless, every method takes `&Connection`.
pub struct FeedbackRepo;

impl FeedbackRepo {
    /// Insert a new feedback row.
    pub fn insert(conn: &Connection, session_id: &str, payload: &Value) -> Result<FeedbackRow> {
        let id = format!("fb_{}", Uuid::now_v7());
        let now = chrono::Utc::now().to_rfc3339();
        let feedback_data = serde_json::to_string(payload)?;

        let _ = conn.execute(
            "INSERT INTO feedback_history (id, session_id, feedback_data, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![id, session_id, feedback_data, now],
        )?;

        Ok(FeedbackRow {
            id,
            session_id: session_id.to_owned(),
            feedback_data,
            created_at: now,
        })
    }

    /// Whether a feedback row with this exact payload already exists for the
    /// session.
    pub fn exists(conn: &Connection, session_id: &str, payload: &Value) -> Result<bool> {
        let rows = Self::list_for_session(conn, session_id)?;
        for row in rows {
            let stored: Value = serde_json::from_str(&row.feedback_data)?;
            if &stored == payload {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// List a session's feedback in insertion order.
    pub fn list_for_session(conn: &Connection, session_id: &str) -> Result<Vec<FeedbackRow>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM feedback_history WHERE session_id = ?1 ORDER BY created_at, rowid",
        )?;
        let rows = stmt
            .query_map(params![session_id], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FeedbackRow> {
        Ok(FeedbackRow {
            id: row.get("id")?,
            session_id: row.get("session_id")?,
            feedback_data: row.get("feedback_data")?,
            created_at: row.get("created_at")?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

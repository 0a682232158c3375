//! Session repository — session rows and the `(user, challenge)` natural key.
//!
//! A session is "the same session" when its owning user and design challenge
//! match; saves route through [`SessionRepo::find_by_challenge`] so an
//! unchanged challenge updates in place instead of duplicating.

use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use crate::errors::Result;
use crate::sqlite::row_types::SessionRow;

/// Options for creating a new session row.
pub struct CreateSessionOptions<'a> {
    /// Owning user.
    pub user_id: &'a str,
    /// The design challenge text.
    pub design_challenge: &'a str,
    /// Target users.
    pub target_users: &'a [String],
    /// Emotional goals.
    pub emotional_goals: &'a [String],
    /// Refined problem statement, if already set.
    pub problem_statement: Option<&'a str>,
    /// Proposed solution, if already set.
    pub proposed_solution: Option<&'a str>,
    /// Workflow status text.
    pub status: &'a str,
}

fn to_json_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_owned())
}

/// Session repository — stateless, every method takes `&Connection`.
pub struct SessionRepo;

impl SessionRepo {
    /// Create a new session.
    pub fn create(conn: &Connection, opts: &CreateSessionOptions<'_>) -> Result<SessionRow> {
        let id = format!("sess_{}", Uuid::now_v7());
        let now = chrono::Utc::now().to_rfc3339();
        let target_users = to_json_list(opts.target_users);
        let emotional_goals = to_json_list(opts.emotional_goals);

        let _ = conn.execute(
            "INSERT INTO design_sessions (id, user_id, design_challenge, target_users,
             emotional_goals, problem_statement, proposed_solution, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                id,
                opts.user_id,
                opts.design_challenge,
                target_users,
                emotional_goals,
                opts.problem_statement,
                opts.proposed_solution,
                opts.status,
                now,
                now,
            ],
        )?;

        Ok(SessionRow {
            id,
            user_id: opts.user_id.to_owned(),
            design_challenge: opts.design_challenge.to_owned(),
            target_users,
            emotional_goals,
            problem_statement: opts.problem_statement.map(String::from),
            proposed_solution: opts.proposed_solution.map(String::from),
            status: opts.status.to_owned(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Get session by ID.
    pub fn get_by_id(conn: &Connection, session_id: &str) -> Result<Option<SessionRow>> {
        let row = conn
            .query_row(
                "SELECT * FROM design_sessions WHERE id = ?1",
                params![session_id],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Find the session for `(user_id, design_challenge)`, if one exists.
    pub fn find_by_challenge(
        conn: &Connection,
        user_id: &str,
        design_challenge: &str,
    ) -> Result<Option<SessionRow>> {
        let row = conn
            .query_row(
                "SELECT * FROM design_sessions WHERE user_id = ?1 AND design_challenge = ?2",
                params![user_id, design_challenge],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Update a session's mutable progress fields and bump `updated_at`.
    pub fn update_progress(
        conn: &Connection,
        session_id: &str,
        problem_statement: Option<&str>,
        proposed_solution: Option<&str>,
        status: &str,
    ) -> Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();
        let changed = conn.execute(
            "UPDATE design_sessions
             SET problem_statement = ?1, proposed_solution = ?2, status = ?3, updated_at = ?4
             WHERE id = ?5",
            params![problem_statement, proposed_solution, status, now, session_id],
        )?;
        Ok(changed > 0)
    }

    /// List a user's sessions, newest first.
    pub fn list_for_user(conn: &Connection, user_id: &str) -> Result<Vec<SessionRow>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM design_sessions WHERE user_id = ?1 ORDER BY created_at DESC",
        )?;
        let rows = stmt
            .query_map(params![user_id], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SessionRow> {
        Ok(SessionRow {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            design_challenge: row.get("design_challenge")?,
            target_users: row.get("target_users")?,
            emotional_goals: row.get("emotional_goals")?,
            problem_statement: row.get("problem_statement")?,
            proposed_solution: row.get("proposed_solution")?,
            status: row.get("status")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

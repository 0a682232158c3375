//! The persistence gateway — [`DesignStore`].
//!
//! One explicitly constructed instance per process, injected into each
//! session's runtime. Saves are transactional upserts keyed by
//! `(user_id, design_challenge)`; child rows (iterations, feedback) are
//! reconciled append-only by content set-difference; the capsule is written
//! once. Required-field validation runs before any write, so a failed
//! validation never produces partial writes.

use rusqlite::Connection;
use tracing::{debug, instrument};

use atelier_core::ids::{SessionId, UserId};
use atelier_core::session::{
    ClarityCapsule, DesignIteration, FeedbackEntry, SessionSnapshot, SessionStatus,
};

use crate::errors::{Result, StoreError};
use crate::sqlite::connection::{ConnectionConfig, ConnectionPool, PooledConnection};
use crate::sqlite::migrations::run_migrations;
use crate::sqlite::repositories::capsule::CapsuleRepo;
use crate::sqlite::repositories::feedback::FeedbackRepo;
use crate::sqlite::repositories::iteration::IterationRepo;
use crate::sqlite::repositories::session::{CreateSessionOptions, SessionRepo};
use crate::sqlite::repositories::user::UserRepo;
use crate::sqlite::row_types::SessionRow;

fn require_field<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(StoreError::Validation(format!(
            "required field '{field}' is missing or empty"
        ))),
    }
}

fn parse_json_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// Gateway over the relational store.
///
/// Cheap to share (`Clone` clones the pool handle); safe for concurrent use
/// by independent sessions — write serialization is delegated to `SQLite`.
#[derive(Clone)]
pub struct DesignStore {
    pool: ConnectionPool,
}

impl DesignStore {
    /// Wrap an existing pool. Assumes migrations have been run.
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    /// Open an in-memory store with migrations applied (for testing).
    pub fn in_memory() -> Result<Self> {
        let pool = crate::sqlite::connection::new_in_memory(&ConnectionConfig {
            // A single connection so every caller sees the same in-memory db.
            pool_size: 1,
            ..ConnectionConfig::default()
        })?;
        let conn = pool.get()?;
        let _ = run_migrations(&conn)?;
        Ok(Self { pool })
    }

    /// Open a file-backed store with migrations applied.
    pub fn open(path: &str, config: &ConnectionConfig) -> Result<Self> {
        let pool = crate::sqlite::connection::new_file(path, config)?;
        let conn = pool.get()?;
        let _ = run_migrations(&conn)?;
        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection> {
        Ok(self.pool.get()?)
    }

    /// Get a user by exact name match, creating one on miss.
    ///
    /// Returns `(id, was_created)` so callers can branch on new-vs-returning
    /// greeting logic.
    #[instrument(skip(self))]
    pub fn get_or_create_user(&self, first_name: &str, last_name: &str) -> Result<(UserId, bool)> {
        let _ = require_field(Some(first_name), "first_name")?;
        let _ = require_field(Some(last_name), "last_name")?;

        let conn = self.conn()?;
        let (user, was_created) = UserRepo::get_or_create(&conn, first_name, last_name)?;
        debug!(user_id = %user.id, was_created, "get_or_create_user");
        Ok((UserId::from_string(user.id), was_created))
    }

    /// List a user's session rows, newest first.
    ///
    /// The id is validated before any query executes.
    pub fn list_user_sessions(&self, user_id: &UserId) -> Result<Vec<SessionRow>> {
        let user_id = UserId::parse(user_id.as_str())?;
        let conn = self.conn()?;
        SessionRepo::list_for_user(&conn, user_id.as_str())
    }

    /// Save a session snapshot with upsert-by-natural-key semantics.
    ///
    /// Looks up an existing session for `(user, design_challenge)`: updates
    /// in place if found, inserts otherwise, then reconciles child rows by
    /// inserting only content-new iterations and feedback (append-only).
    /// The whole save runs in one transaction.
    #[instrument(skip_all)]
    pub fn save_session(&self, snapshot: &SessionSnapshot) -> Result<SessionId> {
        let first_name = require_field(snapshot.first_name.as_deref(), "first_name")?;
        let last_name = require_field(snapshot.last_name.as_deref(), "last_name")?;
        let challenge = require_field(snapshot.design_challenge.as_deref(), "design_challenge")?;

        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;

        let (user, _) = UserRepo::get_or_create(&tx, first_name, last_name)?;

        let session_id = match SessionRepo::find_by_challenge(&tx, &user.id, challenge)? {
            Some(existing) => {
                let _ = SessionRepo::update_progress(
                    &tx,
                    &existing.id,
                    snapshot.problem_statement.as_deref(),
                    snapshot.proposed_solution.as_deref(),
                    snapshot.status.as_str(),
                )?;
                debug!(session_id = %existing.id, "updated existing session");
                existing.id
            }
            None => {
                let created = SessionRepo::create(
                    &tx,
                    &CreateSessionOptions {
                        user_id: &user.id,
                        design_challenge: challenge,
                        target_users: &snapshot.target_users,
                        emotional_goals: &snapshot.emotional_goals,
                        problem_statement: snapshot.problem_statement.as_deref(),
                        proposed_solution: snapshot.proposed_solution.as_deref(),
                        status: snapshot.status.as_str(),
                    },
                )?;
                debug!(session_id = %created.id, "created new session");
                created.id
            }
        };

        for iteration in &snapshot.iterations {
            if !IterationRepo::exists(
                &tx,
                &session_id,
                &iteration.problem_statement,
                &iteration.solution,
            )? {
                let _ = IterationRepo::insert(
                    &tx,
                    &session_id,
                    &iteration.problem_statement,
                    &iteration.solution,
                    &iteration.features,
                )?;
            }
        }

        for entry in &snapshot.feedback {
            if !FeedbackRepo::exists(&tx, &session_id, &entry.payload)? {
                let _ = FeedbackRepo::insert(&tx, &session_id, &entry.payload)?;
            }
        }

        if let Some(capsule) = &snapshot.clarity_capsule {
            if CapsuleRepo::get_for_session(&tx, &session_id)?.is_none() {
                let _ = CapsuleRepo::insert(&tx, &session_id, capsule)?;
            }
        }

        tx.commit()?;
        Ok(SessionId::from_string(session_id))
    }

    /// Load a full session snapshot by id.
    ///
    /// The id is validated before any query. Fails with
    /// [`StoreError::SessionNotFound`] if the session does not resolve and
    /// [`StoreError::UserNotFound`] if the linked user is missing.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub fn load_session(&self, session_id: &SessionId) -> Result<SessionSnapshot> {
        let session_id = SessionId::parse(session_id.as_str())?;
        let conn = self.conn()?;
        Self::load_on(&conn, session_id.as_str())
    }

    fn load_on(conn: &Connection, session_id: &str) -> Result<SessionSnapshot> {
        let session = SessionRepo::get_by_id(conn, session_id)?
            .ok_or_else(|| StoreError::SessionNotFound(session_id.to_owned()))?;
        let user = UserRepo::get_by_id(conn, &session.user_id)?
            .ok_or_else(|| StoreError::UserNotFound(session.user_id.clone()))?;

        let status = SessionStatus::from_str_opt(&session.status).ok_or_else(|| {
            StoreError::Validation(format!("unrecognized session status: {}", session.status))
        })?;

        let iterations = IterationRepo::list_for_session(conn, session_id)?
            .into_iter()
            .map(|row| DesignIteration {
                problem_statement: row.problem_statement,
                solution: row.solution,
                features: parse_json_list(&row.features),
            })
            .collect();

        let feedback = FeedbackRepo::list_for_session(conn, session_id)?
            .into_iter()
            .map(|row| {
                Ok(FeedbackEntry {
                    payload: serde_json::from_str(&row.feedback_data)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let clarity_capsule =
            CapsuleRepo::get_for_session(conn, session_id)?.map(|row| ClarityCapsule {
                problem_statement: row.problem_statement,
                solution_concept: row.solution_concept,
                strengths: parse_json_list(&row.strengths),
                blind_spots: parse_json_list(&row.blind_spots),
                next_steps: parse_json_list(&row.next_steps),
            });

        Ok(SessionSnapshot {
            user_id: Some(UserId::from_string(user.id)),
            first_name: Some(user.first_name),
            last_name: Some(user.last_name),
            design_challenge: Some(session.design_challenge),
            target_users: parse_json_list(&session.target_users),
            emotional_goals: parse_json_list(&session.emotional_goals),
            problem_statement: session.problem_statement,
            proposed_solution: session.proposed_solution,
            status,
            iterations,
            feedback,
            clarity_capsule,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! User repository — get-or-create keyed by exact name match.
//!
//! Users are created on first identification and never mutated afterwards.
//! The `(first_name, last_name)` pair is the natural key; matching is exact
//! and case-sensitive.

use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use crate::errors::Result;
use crate::sqlite::row_types::UserRow;

/// User repository — stateless, every method takes `&Connection`.
pub struct UserRepo;

impl UserRepo {
    /// Create a new user.
    pub fn create(conn: &Connection, first_name: &str, last_name: &str) -> Result<UserRow> {
        let id = format!("usr_{}", Uuid::now_v7());
        let now = chrono::Utc::now().to_rfc3339();
        let _ = conn.execute(
            "INSERT INTO users (id, first_name, last_name, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![id, first_name, last_name, now],
        )?;
        Ok(UserRow {
            id,
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            created_at: now,
        })
    }

    /// Get user by exact name match.
    pub fn get_by_name(
        conn: &Connection,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<UserRow>> {
        let row = conn
            .query_row(
                "SELECT id, first_name, last_name, created_at
                 FROM users WHERE first_name = ?1 AND last_name = ?2",
                params![first_name, last_name],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Get user by ID.
    pub fn get_by_id(conn: &Connection, user_id: &str) -> Result<Option<UserRow>> {
        let row = conn
            .query_row(
                "SELECT id, first_name, last_name, created_at FROM users WHERE id = ?1",
                params![user_id],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Get an existing user by name, or create one.
    ///
    /// Returns `(row, was_created)` so callers can branch on new-vs-returning
    /// greeting logic.
    pub fn get_or_create(
        conn: &Connection,
        first_name: &str,
        last_name: &str,
    ) -> Result<(UserRow, bool)> {
        if let Some(user) = Self::get_by_name(conn, first_name, last_name)? {
            return Ok((user, false));
        }
        let user = Self::create(conn, first_name, last_name)?;
        Ok((user, true))
    }

    /// Count total users.
    pub fn count(conn: &Connection) -> Result<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
        Ok(UserRow {
            id: row.get("id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            created_at: row.get("created_at")?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use crate::sqlite::migrations::run_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn create_user() {
        let conn = setup();
        let user = UserRepo::create(&conn, "Ada", "Lovelace").unwrap();

        assert!(user.id.starts_with("usr_"));
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.last_name, "Lovelace");
        assert!(!user.created_at.is_empty());
    }

    #[test]
    fn create_duplicate_name_fails() {
        let conn = setup();
        UserRepo::create(&conn, "Ada", "Lovelace").unwrap();
        let result = UserRepo::create(&conn, "Ada", "Lovelace");
        assert!(result.is_err());
    }

    #[test]
    fn get_by_name() {
        let conn = setup();
        let user = UserRepo::create(&conn, "Ada", "Lovelace").unwrap();

        let found = UserRepo::get_by_name(&conn, "Ada", "Lovelace")
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);
    }

    #[test]
    fn get_by_name_is_case_sensitive() {
        let conn = setup();
        UserRepo::create(&conn, "Ada", "Lovelace").unwrap();

        let found = UserRepo::get_by_name(&conn, "ada", "lovelace").unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn get_by_name_not_found() {
        let conn = setup();
        let found = UserRepo::get_by_name(&conn, "Grace", "Hopper").unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn get_by_id() {
        let conn = setup();
        let user = UserRepo::create(&conn, "Ada", "Lovelace").unwrap();

        let found = UserRepo::get_by_id(&conn, &user.id).unwrap().unwrap();
        assert_eq!(found.first_name, "Ada");
    }

    #[test]
    fn get_by_id_not_found() {
        let conn = setup();
        let found = UserRepo::get_by_id(&conn, "usr_nonexistent").unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn get_or_create_creates_new() {
        let conn = setup();
        let (user, was_created) = UserRepo::get_or_create(&conn, "Ada", "Lovelace").unwrap();
        assert!(was_created);
        assert!(user.id.starts_with("usr_"));
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let conn = setup();
        let (first, created_first) = UserRepo::get_or_create(&conn, "Ada", "Lovelace").unwrap();
        let (second, created_second) = UserRepo::get_or_create(&conn, "Ada", "Lovelace").unwrap();

        assert!(created_first);
        assert!(!created_second);
        assert_eq!(first.id, second.id);
        assert_eq!(UserRepo::count(&conn).unwrap(), 1);
    }

    #[test]
    fn count_users() {
        let conn = setup();
        assert_eq!(UserRepo::count(&conn).unwrap(), 0);
        UserRepo::create(&conn, "Ada", "Lovelace").unwrap();
        UserRepo::create(&conn, "Grace", "Hopper").unwrap();
        assert_eq!(UserRepo::count(&conn).unwrap(), 2);
    }
}

//! Error types for the persistence gateway.
//!
//! [`StoreError`] is the primary error type returned by all gateway
//! operations. Raw `rusqlite`/pool failures are wrapped here and never leak
//! past the store boundary; the runtime maps these variants onto its own
//! domain errors.

use thiserror::Error;

use atelier_core::ids::InvalidIdError;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `SQLite` database error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// JSON serialization/deserialization error.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Schema migration failed.
    #[error("migration error: {message}")]
    Migration {
        /// Describes which migration failed and why.
        message: String,
    },

    /// Requested user was not found.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// Requested session was not found.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// An identifier argument was malformed; nothing was queried.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A required field was missing or empty; nothing was written.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl From<InvalidIdError> for StoreError {
    fn from(err: InvalidIdError) -> Self {
        Self::InvalidId(err.to_string())
    }
}

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::ids::SessionId;

    #[test]
    fn sqlite_error_display() {
        let err = StoreError::Sqlite(rusqlite::Error::QueryReturnedNoRows);
        assert!(err.to_string().contains("sqlite error"));
    }

    #[test]
    fn serde_error_display() {
        let serde_err = serde_json::from_str::<String>("not json").unwrap_err();
        let err = StoreError::Serde(serde_err);
        assert!(err.to_string().contains("serde error"));
    }

    #[test]
    fn migration_error_display() {
        let err = StoreError::Migration {
            message: "v001 failed: table already exists".into(),
        };
        assert_eq!(
            err.to_string(),
            "migration error: v001 failed: table already exists"
        );
    }

    #[test]
    fn user_not_found_display() {
        let err = StoreError::UserNotFound("usr-123".into());
        assert_eq!(err.to_string(), "user not found: usr-123");
    }

    #[test]
    fn session_not_found_display() {
        let err = StoreError::SessionNotFound("sess-123".into());
        assert_eq!(err.to_string(), "session not found: sess-123");
    }

    #[test]
    fn validation_display() {
        let err = StoreError::Validation("required field 'first_name' is missing or empty".into());
        assert!(err.to_string().starts_with("validation failed"));
    }

    #[test]
    fn from_rusqlite_error() {
        let sqlite_err = rusqlite::Error::QueryReturnedNoRows;
        let err: StoreError = sqlite_err.into();
        assert!(matches!(err, StoreError::Sqlite(_)));
    }

    #[test]
    fn from_invalid_id_error() {
        let parse_err = SessionId::parse("bogus").unwrap_err();
        let err: StoreError = parse_err.into();
        assert!(matches!(err, StoreError::InvalidId(_)));
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn result_alias() {
        fn example() -> Result<String> {
            Ok("hello".into())
        }
        assert_eq!(example().unwrap(), "hello");
    }
}

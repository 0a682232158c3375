//! Branded ID newtypes for type safety.
//!
//! Every entity in the Atelier system has a distinct ID type implemented as a
//! newtype wrapper around `String`. This prevents accidentally passing a user
//! ID where a session ID is expected.
//!
//! IDs carry a short entity prefix (`usr_`, `sess_`, …) followed by a UUID v7
//! (time-ordered) generated via [`uuid::Uuid::now_v7`]. [`parse`] on each type
//! rejects malformed ids before they can reach a query.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Error returned when a string is not a well-formed branded ID.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid {expected} id: {value}")]
pub struct InvalidIdError {
    /// The prefix that was expected (e.g. `sess`).
    pub expected: &'static str,
    /// The offending input.
    pub value: String,
}

macro_rules! branded_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new random ID (prefix + UUID v7, time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(format!(concat!($prefix, "_{}"), Uuid::now_v7()))
            }

            /// Parse and validate an existing id string.
            ///
            /// The input must be `<prefix>_<uuid>`. Anything else fails fast
            /// with [`InvalidIdError`] instead of reaching the store.
            pub fn parse(s: &str) -> Result<Self, InvalidIdError> {
                let invalid = || InvalidIdError {
                    expected: $prefix,
                    value: s.to_owned(),
                };
                let raw = s
                    .strip_prefix(concat!($prefix, "_"))
                    .ok_or_else(invalid)?;
                let _ = Uuid::parse_str(raw).map_err(|_| invalid())?;
                Ok(Self(s.to_owned()))
            }

            /// Create from an existing string value without validation.
            ///
            /// For values already known to be well-formed (e.g. read back
            /// from the store). External input goes through [`Self::parse`].
            #[must_use]
            pub fn from_string(s: String) -> Self {
                Self(s)
            }

            /// Return the inner string as a slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume self and return the inner `String`.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

branded_id! {
    /// Unique identifier for a user.
    UserId, "usr"
}

branded_id! {
    /// Unique identifier for a design session.
    SessionId, "sess"
}

branded_id! {
    /// Unique identifier for a design iteration.
    IterationId, "iter"
}

branded_id! {
    /// Unique identifier for a feedback entry.
    FeedbackId, "fb"
}

branded_id! {
    /// Unique identifier for a clarity capsule.
    CapsuleId, "cap"
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_new_is_prefixed_uuid_v7() {
        let id = SessionId::new();
        assert!(id.as_str().starts_with("sess_"));
        let raw = id.as_str().strip_prefix("sess_").unwrap();
        let parsed = Uuid::parse_str(raw).expect("should be valid UUID");
        assert_eq!(parsed.get_version(), Some(uuid::Version::SortRand));
    }

    #[test]
    fn user_id_new_is_prefixed_uuid_v7() {
        let id = UserId::new();
        assert!(id.as_str().starts_with("usr_"));
        let raw = id.as_str().strip_prefix("usr_").unwrap();
        let parsed = Uuid::parse_str(raw).expect("should be valid UUID");
        assert_eq!(parsed.get_version(), Some(uuid::Version::SortRand));
    }

    #[test]
    fn ids_are_unique() {
        let a = SessionId::new();
        let b = SessionId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn parse_roundtrip() {
        let id = SessionId::new();
        let parsed = SessionId::parse(id.as_str()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn parse_rejects_wrong_prefix() {
        let id = UserId::new();
        let err = SessionId::parse(id.as_str()).unwrap_err();
        assert_eq!(err.expected, "sess");
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = SessionId::parse("not-an-id").unwrap_err();
        assert_eq!(err.value, "not-an-id");
    }

    #[test]
    fn parse_rejects_bad_uuid() {
        assert!(SessionId::parse("sess_zzz").is_err());
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(UserId::parse("").is_err());
    }

    #[test]
    fn invalid_id_error_display() {
        let err = SessionId::parse("bogus").unwrap_err();
        assert_eq!(err.to_string(), "invalid sess id: bogus");
    }

    #[test]
    fn from_string() {
        let id = SessionId::from_string("custom-id".to_owned());
        assert_eq!(id.as_str(), "custom-id");
    }

    #[test]
    fn deref_to_str() {
        let id = UserId::from("hello");
        let s: &str = &id;
        assert_eq!(s, "hello");
    }

    #[test]
    fn display() {
        let id = FeedbackId::from("display-me");
        assert_eq!(format!("{id}"), "display-me");
    }

    #[test]
    fn into_string() {
        let id = IterationId::from("convert");
        let s: String = id.into();
        assert_eq!(s, "convert");
    }

    #[test]
    fn serde_roundtrip() {
        let id = CapsuleId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: CapsuleId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn serde_is_transparent() {
        let id = SessionId::from("sess-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"sess-1\"");
    }

    #[test]
    fn hash_and_eq() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        let id = UserId::from("same");
        let _ = set.insert(id.clone());
        let _ = set.insert(id.clone());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn default_creates_new() {
        let id1 = SessionId::default();
        let id2 = SessionId::default();
        assert_ne!(id1, id2, "default should create unique IDs");
    }
}

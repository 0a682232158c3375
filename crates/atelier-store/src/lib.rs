//! # atelier-store
//!
//! Relational persistence gateway with a `SQLite` backend for the Atelier
//! design assistant.
//!
//! Responsible for:
//!
//! - **Schema**: `users`, `design_sessions`, `design_iterations`,
//!   `feedback_history`, `clarity_capsules` with version-tracked migrations
//! - **`SQLite` backend**: `rusqlite` behind an `r2d2` pool with WAL and
//!   foreign keys, repository pattern (user, session, iteration, feedback,
//!   capsule)
//! - **[`DesignStore`]**: high-level gateway — get-or-create users,
//!   upsert-by-natural-key session saves with append-only child
//!   reconciliation, full-session loads
//!
//! All identifier arguments are validated as well-formed branded IDs before
//! any query executes.

#![deny(unsafe_code)]

pub mod errors;
pub mod sqlite;
pub mod store;

pub use errors::{Result, StoreError};
pub use sqlite::connection::{ConnectionConfig, ConnectionPool, new_file, new_in_memory};
pub use sqlite::migrations::run_migrations;
pub use store::gateway::DesignStore;

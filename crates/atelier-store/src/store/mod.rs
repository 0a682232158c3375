//! High-level gateway API over the `SQLite` backend.

pub mod gateway;

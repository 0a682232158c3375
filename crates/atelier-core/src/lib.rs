//! # atelier-core
//!
//! Foundation types for the Atelier design assistant.
//!
//! This crate provides the shared vocabulary that all other Atelier crates
//! depend on:
//!
//! - **Branded IDs**: [`ids::UserId`], [`ids::SessionId`], [`ids::IterationId`],
//!   [`ids::FeedbackId`], [`ids::CapsuleId`] as prefixed newtypes
//! - **Agents**: [`agent::AgentKind`] — the closed Coach/Strategist/Evaluator
//!   enumeration
//! - **Session records**: [`session::SessionSnapshot`] and its children
//!   ([`session::DesignIteration`], [`session::FeedbackEntry`],
//!   [`session::ClarityCapsule`])
//! - **Broadcast events**: [`events::SessionEvent`] for observer fan-out
//! - **Conversation items**: [`context::ContextItem`] for hand-off carry-over
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by `atelier-store` and `atelier-runtime`.

#![deny(unsafe_code)]

pub mod agent;
pub mod context;
pub mod events;
pub mod ids;
pub mod session;

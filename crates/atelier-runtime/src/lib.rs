//! # atelier-runtime
//!
//! Session orchestration and the workflow state machine for the Atelier
//! design assistant.
//!
//! Responsible for:
//!
//! - **[`SessionState`]**: the single source of truth for one user's progress,
//!   with save/load against the persistence gateway
//! - **[`policy`]**: the pure transition function over Coach → Strategist →
//!   Evaluator and the "How might we" rule
//! - **[`SessionOrchestrator`]**: the sole mutator of orchestration state —
//!   transitions, loop-backs, context hand-off, milestone persistence,
//!   snapshot broadcasting
//! - **[`EventEmitter`]**: non-blocking fan-out of session events to observers
//! - **[`SpeechSink`]**: the outbound boundary to the conversational shell
//!
//! One orchestrator instance serves one connected user; it is invoked
//! sequentially by the conversational action dispatcher, so no internal
//! locking is needed per session.

#![deny(unsafe_code)]

pub mod config;
pub mod context;
pub mod emitter;
pub mod errors;
pub mod orchestrator;
pub mod policy;
pub mod session_state;
pub mod shell;

pub use config::OrchestratorConfig;
pub use emitter::EventEmitter;
pub use errors::OrchestratorError;
pub use orchestrator::SessionOrchestrator;
pub use session_state::SessionState;
pub use shell::SpeechSink;

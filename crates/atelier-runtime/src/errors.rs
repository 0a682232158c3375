//! Runtime error types.
//!
//! Every domain error is caught at the orchestrator/agent boundary and
//! converted to user-facing spoken text; none escapes to crash the
//! conversational shell. Store errors are mapped here and never leak raw.

use atelier_store::StoreError;

/// Errors that can occur during session orchestration.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    /// No persistence gateway attached where one is required.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A required field is missing, or input failed a format rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Requested session or user does not resolve.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transition target is not a registered agent.
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    /// Persistence failure at a milestone.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Internal / unexpected error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OrchestratorError {
    /// Whether the user can simply retry the triggering action.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Validation(_) | Self::Persistence(_) | Self::UnknownAgent(_) => true,
            Self::Configuration(_) | Self::NotFound(_) | Self::Internal(_) => false,
        }
    }

    /// Error category string for logging.
    pub fn category(&self) -> &str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::UnknownAgent(_) => "unknown_agent",
            Self::Persistence(_) => "persistence",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<StoreError> for OrchestratorError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SessionNotFound(id) => Self::NotFound(format!("session {id}")),
            StoreError::UserNotFound(id) => Self::NotFound(format!("user {id}")),
            StoreError::Validation(msg) => Self::Validation(msg),
            StoreError::InvalidId(msg) => Self::Validation(msg),
            other => Self::Persistence(other.to_string()),
        }
    }
}

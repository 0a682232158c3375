//! The in-memory session record.
//!
//! [`SessionState`] is the single source of truth for "where is this user in
//! the workflow": the domain snapshot the gateway persists, plus
//! orchestration bookkeeping that never reaches the store. The split is
//! structural — [`SessionState::apply_loaded`] is the one place that decides
//! what a load replaces, so the persisted/ephemeral boundary cannot drift
//! field by field.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use atelier_core::agent::AgentKind;
use atelier_core::ids::SessionId;
use atelier_core::session::SessionSnapshot;
use atelier_store::DesignStore;

use crate::errors::OrchestratorError;

/// One user's progress through the design workflow.
pub struct SessionState {
    /// Domain-persisted fields (what the gateway saves and loads).
    pub snapshot: SessionSnapshot,
    /// The currently active agent.
    pub current_agent: AgentKind,
    /// Append-only history of every activated agent, including repeats.
    pub agent_sequence: Vec<AgentKind>,
    /// Reason given for the last loop-back, if any.
    pub loop_reason: Option<String>,
    /// Loop-back count per target agent.
    pub loop_counts: BTreeMap<AgentKind, u32>,
    /// Session id selected for loading but not yet loaded.
    pub pending_session_id: Option<SessionId>,
    /// Persisted session id, once saved or loaded.
    pub session_id: Option<SessionId>,
    store: Option<Arc<DesignStore>>,
}

impl SessionState {
    /// Create a fresh state with no gateway attached.
    pub fn new() -> Self {
        Self {
            snapshot: SessionSnapshot::default(),
            current_agent: AgentKind::default(),
            agent_sequence: Vec::new(),
            loop_reason: None,
            loop_counts: BTreeMap::new(),
            pending_session_id: None,
            session_id: None,
            store: None,
        }
    }

    /// Create a fresh state with a gateway attached.
    pub fn with_store(store: Arc<DesignStore>) -> Self {
        let mut state = Self::new();
        state.store = Some(store);
        state
    }

    /// The attached gateway, if any.
    pub fn store(&self) -> Option<&Arc<DesignStore>> {
        self.store.as_ref()
    }

    /// Whether the user is identified.
    ///
    /// True iff both name fields are set in memory, or a persisted session is
    /// reachable via the stored user id. The fallback lookup never errors; a
    /// failing gateway reads as "not identified".
    pub fn is_identified(&self) -> bool {
        if self.snapshot.has_identity() {
            return true;
        }
        match (&self.snapshot.user_id, &self.store) {
            (Some(user_id), Some(store)) => store
                .list_user_sessions(user_id)
                .map(|sessions| !sessions.is_empty())
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Clear all domain fields and orchestration bookkeeping back to initial
    /// values. The gateway handle is untouched.
    pub fn reset(&mut self) {
        self.snapshot = SessionSnapshot::default();
        self.current_agent = AgentKind::default();
        self.agent_sequence.clear();
        self.loop_reason = None;
        self.loop_counts.clear();
        self.pending_session_id = None;
        self.session_id = None;
    }

    /// Deterministic multi-line rendering of all non-null domain fields.
    pub fn summarize(&self) -> String {
        self.snapshot.summarize()
    }

    /// Persist the domain snapshot through the gateway.
    ///
    /// Fails with [`OrchestratorError::Configuration`] if no gateway is
    /// attached, and with [`OrchestratorError::Validation`] if required
    /// identity/content fields are missing (raised by the gateway before any
    /// write).
    pub fn save(&mut self) -> Result<SessionId, OrchestratorError> {
        let store = self.store.as_ref().ok_or_else(|| {
            OrchestratorError::Configuration(
                "no persistence gateway attached; set one before saving".into(),
            )
        })?;
        let session_id = store.save_session(&self.snapshot)?;
        debug!(session_id = %session_id, "session state saved");
        self.session_id = Some(session_id.clone());
        Ok(session_id)
    }

    /// Replace domain state with gateway-sourced data for `session_id`.
    ///
    /// Fails with [`OrchestratorError::NotFound`] if the id does not resolve;
    /// on failure the in-memory state is unchanged.
    pub fn load(&mut self, session_id: &SessionId) -> Result<(), OrchestratorError> {
        let store = self.store.as_ref().ok_or_else(|| {
            OrchestratorError::Configuration(
                "no persistence gateway attached; set one before loading".into(),
            )
        })?;
        let loaded = store.load_session(session_id).map_err(|err| {
            warn!(session_id = %session_id, error = %err, "session load failed");
            OrchestratorError::from(err)
        })?;
        self.apply_loaded(session_id.clone(), loaded);
        Ok(())
    }

    /// Apply a loaded snapshot.
    ///
    /// Domain-persisted fields are replaced wholesale; orchestration
    /// bookkeeping (active agent, sequence, loop tracking, pending id) resets
    /// to initial values; the gateway handle is preserved.
    fn apply_loaded(&mut self, session_id: SessionId, snapshot: SessionSnapshot) {
        self.snapshot = snapshot;
        self.session_id = Some(session_id);
        self.current_agent = AgentKind::default();
        self.agent_sequence.clear();
        self.loop_reason = None;
        self.loop_counts.clear();
        self.pending_session_id = None;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

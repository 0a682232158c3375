//! Domain records for a design session.
//!
//! - [`SessionStatus`]: the linear workflow status
//! - [`DesignIteration`] / [`FeedbackEntry`]: append-only history entries
//! - [`ClarityCapsule`]: the terminal summary artifact, written exactly once
//! - [`SessionSnapshot`]: every domain-persisted field of one session
//!
//! [`SessionSnapshot`] is exactly the set of fields the persistence gateway
//! reads and writes. Orchestration bookkeeping (active agent, loop counters)
//! lives in the runtime crate and is never persisted.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::ids::UserId;

// ─────────────────────────────────────────────────────────────────────────────
// Workflow status
// ─────────────────────────────────────────────────────────────────────────────

/// Workflow status of a design session.
///
/// Flow: `awaiting_problem_definition → ready_for_evaluation →
/// evaluation_complete`. Forward motion is driven by data completeness, not
/// by a scheduler; loop-backs do not rewind the status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// The challenge is being articulated; no solution yet.
    AwaitingProblemDefinition,
    /// A solution has been proposed and awaits evaluation.
    ReadyForEvaluation,
    /// The clarity capsule has been generated; the workflow is terminal.
    EvaluationComplete,
}

impl SessionStatus {
    /// Stable text form used in the `design_sessions.status` column.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingProblemDefinition => "awaiting_problem_definition",
            Self::ReadyForEvaluation => "ready_for_evaluation",
            Self::EvaluationComplete => "evaluation_complete",
        }
    }

    /// Parse the stored text form. Returns `None` for anything unrecognized.
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "awaiting_problem_definition" => Some(Self::AwaitingProblemDefinition),
            "ready_for_evaluation" => Some(Self::ReadyForEvaluation),
            "evaluation_complete" => Some(Self::EvaluationComplete),
            _ => None,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self::AwaitingProblemDefinition
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// History entries
// ─────────────────────────────────────────────────────────────────────────────

/// One design iteration: a `(problem_statement, solution)` pair.
///
/// The iteration log is append-only; the gateway deduplicates on the exact
/// pair before insert.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignIteration {
    /// Problem statement at the time of the iteration.
    pub problem_statement: String,
    /// Proposed solution text.
    pub solution: String,
    /// Optional key features named alongside the solution.
    #[serde(default)]
    pub features: Vec<String>,
}

/// One feedback entry: an opaque structured payload.
///
/// Append-only; the gateway deduplicates by exact payload match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    /// Structured feedback payload (originally free text plus optional rating).
    pub payload: Value,
}

impl FeedbackEntry {
    /// Wrap a plain feedback string into the standard payload shape.
    #[must_use]
    pub fn from_text(feedback: impl Into<String>) -> Self {
        Self {
            payload: serde_json::json!({ "feedback": feedback.into() }),
        }
    }
}

/// Terminal summary artifact, created exactly once at workflow completion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClarityCapsule {
    /// Final problem statement.
    pub problem_statement: String,
    /// Final solution concept.
    pub solution_concept: String,
    /// Strengths identified by the evaluation.
    pub strengths: Vec<String>,
    /// Blind spots identified by the evaluation.
    pub blind_spots: Vec<String>,
    /// Recommended next steps.
    pub next_steps: Vec<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Session snapshot
// ─────────────────────────────────────────────────────────────────────────────

/// Every domain-persisted field of one design session.
///
/// This is the record the gateway saves and loads. It deliberately excludes
/// orchestration bookkeeping so the persisted/ephemeral split is visible in
/// the type rather than in ad hoc copy logic.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Assigned user id, once identified against the store.
    pub user_id: Option<UserId>,
    /// User's first name.
    pub first_name: Option<String>,
    /// User's last name.
    pub last_name: Option<String>,
    /// The captured design challenge.
    pub design_challenge: Option<String>,
    /// Target users for the design.
    pub target_users: Vec<String>,
    /// Desired emotional outcomes.
    pub emotional_goals: Vec<String>,
    /// The refined "How might we…" statement.
    pub problem_statement: Option<String>,
    /// The proposed solution description.
    pub proposed_solution: Option<String>,
    /// Workflow status.
    pub status: SessionStatus,
    /// Append-only iteration log.
    pub iterations: Vec<DesignIteration>,
    /// Append-only feedback log.
    pub feedback: Vec<FeedbackEntry>,
    /// Terminal capsule, once generated.
    pub clarity_capsule: Option<ClarityCapsule>,
}

impl SessionSnapshot {
    /// Whether both name fields are set.
    #[must_use]
    pub fn has_identity(&self) -> bool {
        self.first_name.is_some() && self.last_name.is_some()
    }

    /// Deterministic multi-line rendering of all non-null fields.
    ///
    /// Used for hand-off context and "welcome back" narration; must be
    /// stable given identical inputs.
    #[must_use]
    pub fn summarize(&self) -> String {
        let mut parts = Vec::new();
        if self.has_identity() {
            let first = self.first_name.as_deref().unwrap_or_default();
            let last = self.last_name.as_deref().unwrap_or_default();
            let id = self.user_id.as_ref().map_or("unassigned", |u| u.as_str());
            parts.push(format!("User: {first} {last} (ID: {id})"));
        } else {
            parts.push("User not yet identified.".to_owned());
        }
        if let Some(challenge) = &self.design_challenge {
            parts.push(format!("Design Challenge: {challenge}"));
        }
        if !self.target_users.is_empty() {
            parts.push(format!("Target Users: {}", self.target_users.join(", ")));
        }
        if !self.emotional_goals.is_empty() {
            parts.push(format!(
                "Emotional Goals: {}",
                self.emotional_goals.join(", ")
            ));
        }
        if let Some(statement) = &self.problem_statement {
            parts.push(format!("Problem Statement: {statement}"));
        }
        if let Some(solution) = &self.proposed_solution {
            parts.push(format!("Proposed Solution: {solution}"));
        }
        parts.join("\n")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

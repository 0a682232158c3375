//! The closed agent enumeration.
//!
//! The workflow has exactly three agents. They are a fixed set, not a
//! dynamic registry: lookups by wire name return `None` for anything else,
//! and the orchestrator turns that into a typed error instead of a silent
//! dictionary miss.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three agents of the design workflow, in forward order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    /// Helps the user articulate their design challenge.
    Coach,
    /// Refines the problem statement and proposes a solution.
    Strategist,
    /// Evaluates the solution and produces structured feedback.
    Evaluator,
}

impl AgentKind {
    /// Every agent, in workflow order.
    pub const ALL: [Self; 3] = [Self::Coach, Self::Strategist, Self::Evaluator];

    /// Wire name used in snapshots, transcripts, and shell lookups.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Coach => "design_coach",
            Self::Strategist => "design_strategist",
            Self::Evaluator => "design_evaluator",
        }
    }

    /// Human-readable name for spoken messages.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Coach => "Design Coach",
            Self::Strategist => "Design Strategist",
            Self::Evaluator => "Design Evaluator",
        }
    }

    /// Resolve a wire name back to an agent, if it names one.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "design_coach" => Some(Self::Coach),
            "design_strategist" => Some(Self::Strategist),
            "design_evaluator" => Some(Self::Evaluator),
            _ => None,
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Default for AgentKind {
    /// Conversations open with the Coach.
    fn default() -> Self {
        Self::Coach
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

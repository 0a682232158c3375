//! The workflow policy — pure decision logic, no I/O.
//!
//! Maps "current agent + session state" to "next agent + hand-off context".
//! Forward motion is driven by data completeness: the Strategist is reachable
//! once a challenge exists, the Evaluator once a solution exists, and the
//! Evaluator is terminal. Loop-backs are a distinct operation owned by the
//! orchestrator; this module only words their context message.

use atelier_core::agent::AgentKind;
use atelier_core::session::SessionSnapshot;

use crate::errors::OrchestratorError;

/// Spoken when the Evaluator is asked for a next step.
pub const TERMINAL_MESSAGE: &str = "There are no further steps in this design flow.";

/// Outcome of the transition function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NextStep {
    /// Move to `target`, injecting `context` into its conversation.
    Advance {
        /// The agent to activate.
        target: AgentKind,
        /// System-level hand-off context for the incoming agent.
        context: String,
    },
    /// No forward transition is defined; surface `message` and stay.
    Stay {
        /// Explanation spoken to the user.
        message: String,
    },
}

/// Compute the next agent for the current workflow state.
pub fn next(current: AgentKind, snapshot: &SessionSnapshot) -> NextStep {
    match current {
        AgentKind::Coach => match &snapshot.design_challenge {
            Some(challenge) => NextStep::Advance {
                target: AgentKind::Strategist,
                context: format!(
                    "The user has defined their design challenge as: '{challenge}'. \
                     Your task is to help them refine this into a 'How might we...' \
                     statement and then propose a solution."
                ),
            },
            None => NextStep::Stay {
                message: "I still need your design challenge before we can move on. \
                          Please describe it first."
                    .to_owned(),
            },
        },
        AgentKind::Strategist => match &snapshot.proposed_solution {
            Some(solution) => NextStep::Advance {
                target: AgentKind::Evaluator,
                context: format!(
                    "The user has proposed the following solution: {solution}. \
                     Your task is to evaluate it."
                ),
            },
            None => NextStep::Stay {
                message: "We still need a proposed solution before moving to evaluation."
                    .to_owned(),
            },
        },
        AgentKind::Evaluator => NextStep::Stay {
            message: TERMINAL_MESSAGE.to_owned(),
        },
    }
}

/// Context message injected on an explicit loop-back.
pub fn loop_back_context(reason: &str) -> String {
    format!("The user wants to revise the design. Here is their feedback: {reason}")
}

/// Validate the "How might we" rule for a problem statement.
///
/// The normalized (leading-whitespace-trimmed, case-insensitive) text must
/// begin with "how might we". Rejection carries the corrective message and
/// implies no state change.
pub fn validate_problem_statement(statement: &str) -> Result<(), OrchestratorError> {
    let normalized = statement.trim_start().to_lowercase();
    if normalized.starts_with("how might we") {
        Ok(())
    } else {
        Err(OrchestratorError::Validation(
            "Problem statement must start with 'How might we...' to follow \
             design thinking best practices."
                .to_owned(),
        ))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! Broadcast event types for observer fan-out.
//!
//! Every record crossing the observer boundary is one [`SessionEvent`]
//! variant, tagged with `type` on the wire:
//!
//! - `agent_state`: emitted on every agent transition
//! - `transcript`: one record per spoken or heard utterance chunk
//! - `clarity_capsule`: emitted once when the terminal capsule is generated
//!
//! The core's obligation ends at producing these well-formed records; how a
//! transport delivers them (data channel, websocket, log) is out of scope.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Who produced an utterance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    /// Stable identity string (agent wire name, or the user's identity).
    pub identity: String,
    /// Display name.
    pub name: String,
}

/// One transcript record.
///
/// Streaming narration publishes `is_final = false` chunks followed by a
/// terminal `is_final = true` record for the same logical utterance. Every
/// utterance always ends with exactly one final record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    /// Utterance text (possibly a partial chunk).
    pub message: String,
    /// Whether this record terminates the utterance.
    pub is_final: bool,
    /// Originating speaker.
    pub from: Speaker,
    /// Epoch milliseconds at emission time.
    pub timestamp: i64,
}

impl TranscriptMessage {
    /// Build a record stamped with the current time.
    #[must_use]
    pub fn now(message: impl Into<String>, is_final: bool, from: Speaker) -> Self {
        Self {
            message: message.into(),
            is_final,
            from,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// A record broadcast to session observers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// Orchestration state after a transition.
    #[serde(rename = "agent_state")]
    AgentState {
        /// Wire name of the now-active agent.
        current_agent_name: String,
        /// Append-only history of every activated agent, including repeats.
        agent_sequence: Vec<String>,
        /// Last loop-back reason, if any.
        loop_reason: Option<String>,
        /// Loop-back count per target agent wire name.
        loop_counts: BTreeMap<String, u32>,
    },

    /// A spoken or heard utterance chunk.
    #[serde(rename = "transcript")]
    Transcript {
        /// The transcript record.
        #[serde(flatten)]
        message: TranscriptMessage,
    },

    /// The terminal summary artifact.
    #[serde(rename = "clarity_capsule")]
    ClarityCapsule {
        /// Final problem statement.
        problem_statement: String,
        /// Final solution concept.
        solution_concept: String,
        /// Identified strengths.
        strengths: Vec<String>,
        /// Identified blind spots.
        blind_spots: Vec<String>,
        /// Recommended next steps.
        next_steps: Vec<String>,
    },
}

impl SessionEvent {
    /// Wire value of the `type` tag.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::AgentState { .. } => "agent_state",
            Self::Transcript { .. } => "transcript",
            Self::ClarityCapsule { .. } => "clarity_capsule",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn agent_state_sample() -> SessionEvent {
        let mut loop_counts = BTreeMap::new();
        let _ = loop_counts.insert("design_strategist".to_owned(), 2);
        SessionEvent::AgentState {
            current_agent_name: "design_strategist".into(),
            agent_sequence: vec![
                "design_coach".into(),
                "design_strategist".into(),
                "design_evaluator".into(),
                "design_strategist".into(),
            ],
            loop_reason: Some("tighten the onboarding flow".into()),
            loop_counts,
        }
    }

    #[test]
    fn agent_state_wire_shape() {
        let json = serde_json::to_value(agent_state_sample()).unwrap();
        assert_eq!(json["type"], "agent_state");
        assert_eq!(json["current_agent_name"], "design_strategist");
        assert_eq!(json["agent_sequence"][0], "design_coach");
        assert_eq!(json["loop_reason"], "tighten the onboarding flow");
        assert_eq!(json["loop_counts"]["design_strategist"], 2);
    }

    #[test]
    fn agent_state_roundtrip() {
        let event = agent_state_sample();
        let json = serde_json::to_string(&event).unwrap();
        let back: SessionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn transcript_wire_shape_is_flat() {
        let event = SessionEvent::Transcript {
            message: TranscriptMessage {
                message: "Welcome to the Design Assistant.".into(),
                is_final: true,
                from: Speaker {
                    identity: "design_coach".into(),
                    name: "Design Coach".into(),
                },
                timestamp: 1_754_000_000_000,
            },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "transcript");
        assert_eq!(json["message"], "Welcome to the Design Assistant.");
        assert_eq!(json["is_final"], true);
        assert_eq!(json["from"]["identity"], "design_coach");
        assert_eq!(json["from"]["name"], "Design Coach");
        assert_eq!(json["timestamp"], 1_754_000_000_000_i64);
    }

    #[test]
    fn transcript_now_stamps_time() {
        let message = TranscriptMessage::now(
            "hello",
            false,
            Speaker {
                identity: "user".into(),
                name: "User".into(),
            },
        );
        assert!(!message.is_final);
        assert!(message.timestamp > 0);
    }

    #[test]
    fn capsule_wire_shape() {
        let event = SessionEvent::ClarityCapsule {
            problem_statement: "How might we reduce drop-off?".into(),
            solution_concept: "Guided tour".into(),
            strengths: vec!["simple".into()],
            blind_spots: vec!["power users".into()],
            next_steps: vec!["prototype".into()],
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "clarity_capsule");
        assert_eq!(json["solution_concept"], "Guided tour");
        assert_eq!(json["strengths"][0], "simple");
    }

    #[test]
    fn event_type_accessor() {
        assert_eq!(agent_state_sample().event_type(), "agent_state");
    }

    #[test]
    fn null_loop_reason_serializes() {
        let event = SessionEvent::AgentState {
            current_agent_name: "design_coach".into(),
            agent_sequence: vec!["design_coach".into()],
            loop_reason: None,
            loop_counts: BTreeMap::new(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert!(json["loop_reason"].is_null());
        assert!(json["loop_counts"].as_object().unwrap().is_empty());
    }
}

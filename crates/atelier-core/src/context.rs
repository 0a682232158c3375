//! Conversation items carried across agent hand-offs.
//!
//! Each agent keeps its own ordered item list. When the orchestrator switches
//! agents it copies a bounded tail of the outgoing agent's items into the
//! incoming agent's list; the item `id` is what makes that copy idempotent.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a conversation message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Injected orchestration/system content.
    System,
    /// User utterance.
    User,
    /// Agent utterance.
    Assistant,
}

/// Kind of conversation item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A plain message.
    Message,
    /// An extracted structured action call.
    FunctionCall,
    /// The output returned for an action call.
    FunctionCallOutput,
}

/// One entry in an agent's conversation history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextItem {
    /// Unique item id, used to filter duplicates during carry-over.
    pub id: String,
    /// Item kind.
    pub kind: ItemKind,
    /// Message role (the role of the calling turn for function items).
    pub role: Role,
    /// Text content, or the serialized call/output for function items.
    pub content: String,
}

impl ContextItem {
    fn new(kind: ItemKind, role: Role, content: impl Into<String>) -> Self {
        Self {
            id: format!("item_{}", Uuid::now_v7()),
            kind,
            role,
            content: content.into(),
        }
    }

    /// A plain message item.
    #[must_use]
    pub fn message(role: Role, content: impl Into<String>) -> Self {
        Self::new(ItemKind::Message, role, content)
    }

    /// A system message item.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::message(Role::System, content)
    }

    /// A function-call item.
    #[must_use]
    pub fn function_call(content: impl Into<String>) -> Self {
        Self::new(ItemKind::FunctionCall, Role::Assistant, content)
    }

    /// A function-call-output item.
    #[must_use]
    pub fn function_call_output(content: impl Into<String>) -> Self {
        Self::new(ItemKind::FunctionCallOutput, Role::Assistant, content)
    }

    /// Whether this is a non-system plain message.
    #[must_use]
    pub fn is_conversational_message(&self) -> bool {
        self.kind == ItemKind::Message && self.role != Role::System
    }

    /// Whether this is a function-call or function-call-output item.
    #[must_use]
    pub fn is_function_item(&self) -> bool {
        matches!(
            self.kind,
            ItemKind::FunctionCall | ItemKind::FunctionCallOutput
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

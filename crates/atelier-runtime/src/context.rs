//! Per-agent conversation context and hand-off carry-over.
//!
//! Each agent keeps its own [`ConversationContext`]. On a transition the
//! orchestrator selects a bounded tail of the outgoing agent's items with
//! [`handoff_items`] and merges it into the incoming agent's context with
//! [`ConversationContext::absorb`], which filters duplicate item ids so
//! repeated hand-offs stay idempotent.

use std::collections::HashSet;

use atelier_core::context::{ContextItem, ItemKind, Role};

/// One agent's ordered conversation history.
#[derive(Clone, Debug, Default)]
pub struct ConversationContext {
    items: Vec<ContextItem>,
}

impl ConversationContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// All items, in order.
    pub fn items(&self) -> &[ContextItem] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the context has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append one item.
    pub fn push(&mut self, item: ContextItem) {
        self.items.push(item);
    }

    /// Append a user message.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(ContextItem::message(Role::User, content));
    }

    /// Append an assistant message.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(ContextItem::message(Role::Assistant, content));
    }

    /// Append a system message.
    pub fn push_system(&mut self, content: impl Into<String>) {
        self.push(ContextItem::system(content));
    }

    /// Merge carried-over items, skipping any whose id is already present.
    pub fn absorb(&mut self, carried: Vec<ContextItem>) {
        let existing: HashSet<&str> = self.items.iter().map(|item| item.id.as_str()).collect();
        let fresh: Vec<ContextItem> = carried
            .into_iter()
            .filter(|item| !existing.contains(item.id.as_str()))
            .collect();
        self.items.extend(fresh);
    }
}

/// Select the hand-off slice of a conversation history.
///
/// Takes the most recent `keep_last` non-system items, then strips
/// function-call entries from the head of the selection so the receiving
/// agent's context never opens mid-function-call.
pub fn handoff_items(items: &[ContextItem], keep_last: usize) -> Vec<ContextItem> {
    let mut selected: Vec<ContextItem> = Vec::new();
    for item in items.iter().rev() {
        if item.kind == ItemKind::Message && item.role == Role::System {
            continue;
        }
        selected.push(item.clone());
        if selected.len() >= keep_last {
            break;
        }
    }
    selected.reverse();

    let first_message = selected
        .iter()
        .position(|item| !item.is_function_item())
        .unwrap_or(selected.len());
    selected.split_off(first_message)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

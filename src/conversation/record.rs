//! Transcript and per-user conversation record.

use crate::completion::Message;
use crate::types::{MessageRole, ModelSelection, UserId};

/// Persona instruction that always opens a transcript.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Ordered conversation replayed on every completion call.
///
/// Always starts with the system message and is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: vec![Message::system(SYSTEM_PROMPT)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Drops everything but the system message.
    pub fn reset(&mut self) {
        self.messages.truncate(1);
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Never true for a transcript built through this type.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn last_role(&self) -> MessageRole {
        self.messages
            .last()
            .map_or(MessageRole::System, |message| message.role)
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct ConversationRecord {
    pub user: UserId,
    pub transcript: Transcript,
    pub model: ModelSelection,
}

impl ConversationRecord {
    #[must_use]
    pub fn new(user: UserId) -> Self {
        Self {
            user,
            transcript: Transcript::new(),
            model: ModelSelection::Unselected,
        }
    }
}

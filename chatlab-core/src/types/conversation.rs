//! Caller-owned conversation history

use crate::types::message::Message;
use serde::{Deserialize, Serialize};

/// An ordered, append-only conversation history
///
/// The history is owned by the caller and passed by mutable reference into
/// each call; the library only ever appends to it. There is no shared or
/// implicit default history, so state cannot leak across sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Create an empty conversation
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the history
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// All messages in insertion order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The most recent message, if any
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages in the history
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the history is empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterate over messages in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

//! Ephemeral per-view chat log
//!
//! Messages live only inside one rendered session view and are discarded on
//! teardown. There is no persistence and no cross-session delivery.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::LOCAL_SENDER;

/// One chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub sender: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only, insertion-ordered message log
#[derive(Debug, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a locally authored message and return a reference to it.
    pub fn append(&mut self, text: impl Into<String>) -> &ChatMessage {
        let idx = self.messages.len();
        self.messages.push(ChatMessage {
            id: Uuid::new_v4(),
            text: text.into(),
            sender: LOCAL_SENDER.to_string(),
            timestamp: Utc::now(),
        });
        &self.messages[idx]
    }

    /// Messages in insertion order.
    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_yields_local_message() {
        let mut log = ChatLog::new();
        assert!(log.is_empty());

        let msg = log.append("hello");
        assert_eq!(msg.text, "hello");
        assert_eq!(msg.sender, LOCAL_SENDER);

        assert_eq!(log.len(), 1);
        let only = log.messages().next().unwrap();
        assert_eq!(only.text, "hello");
    }

    #[test]
    fn messages_keep_insertion_order() {
        let mut log = ChatLog::new();
        log.append("first");
        log.append("second");
        log.append("third");

        let texts: Vec<_> = log.messages().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["first", "second", "third"]);
    }
}

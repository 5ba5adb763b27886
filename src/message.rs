//! Conversation data model
//!
//! These types are shared between the controller, the terminal view and the
//! endpoint wire format, and don't depend on any UI framework.

use serde::{Deserialize, Serialize};

/// A single message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, content: content.into() }
    }
}

/// The role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }

    /// Label shown above an entry in the chat panel
    pub fn display_label(&self) -> &'static str {
        match self {
            ChatRole::System => "System:",
            ChatRole::User => "You:",
            ChatRole::Assistant => "AI:",
        }
    }
}

/// Append-only record of the conversation for one session.
///
/// Messages are only ever pushed by the controller; nothing is edited or
/// removed once committed.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a transcript with a leading system message, if one is given
    pub fn with_system_prompt(prompt: Option<&str>) -> Self {
        let mut transcript = Self::new();
        if let Some(prompt) = prompt.map(str::trim).filter(|p| !p.is_empty()) {
            transcript.push(ChatMessage::system(prompt));
        }
        transcript
    }

    pub(crate) fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }

    #[test]
    fn test_role_deserializes_lowercase() {
        let msg: ChatMessage = serde_json::from_str(r#"{"role":"system","content":"be brief"}"#).unwrap();
        assert_eq!(msg.role, ChatRole::System);
        assert_eq!(msg.content, "be brief");
    }

    #[test]
    fn test_transcript_without_system_prompt_is_empty() {
        assert!(Transcript::with_system_prompt(None).is_empty());
        assert!(Transcript::with_system_prompt(Some("   ")).is_empty());
    }

    #[test]
    fn test_transcript_with_system_prompt() {
        let transcript = Transcript::with_system_prompt(Some("You are a helpful assistant."));
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0], ChatMessage::system("You are a helpful assistant."));
    }

    #[test]
    fn test_transcript_preserves_order() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("one"));
        transcript.push(ChatMessage::assistant("two"));
        let roles: Vec<ChatRole> = transcript.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![ChatRole::User, ChatRole::Assistant]);
        assert_eq!(transcript.last().map(|m| m.content.as_str()), Some("two"));
    }
}

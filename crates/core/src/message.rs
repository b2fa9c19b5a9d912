//! Message and Transcript domain types.
//!
//! These are the core value objects that flow through the system:
//! the user speaks → the provider responds (possibly requesting tools) →
//! tool results are appended → the session decides to continue or stop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a drafting session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message sender in a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
    /// System directive (injected per model call, never stored)
    System,
    /// Tool execution result
    Tool,
}

/// A single message in a transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Tool calls requested by the assistant (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<MessageToolCall>,

    /// If this is a tool result, which tool call it responds to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// If this is a tool result, whether the tool succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub succeeded: Option<bool>,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Create a new system directive message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    /// Create a tool result message.
    pub fn tool_result(
        tool_call_id: impl Into<String>,
        content: impl Into<String>,
        succeeded: bool,
    ) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            succeeded: Some(succeeded),
            ..Self::with_role(Role::Tool, content)
        }
    }

    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            succeeded: None,
            timestamp: Utc::now(),
        }
    }

    /// Whether this is a tool result that reported success.
    pub fn is_successful_tool_result(&self) -> bool {
        self.role == Role::Tool && self.succeeded == Some(true)
    }
}

/// A tool call embedded in an assistant message.
///
/// Execution order equals request order: the session dispatches these
/// strictly in sequence because later calls may depend on document state
/// mutated by earlier ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageToolCall {
    /// Unique ID for this tool call
    pub id: String,

    /// Name of the tool to invoke
    pub name: String,

    /// Arguments as JSON string
    pub arguments: String,
}

/// An append-only, ordered message history for one drafting session.
///
/// Messages are never mutated or removed once pushed. The system
/// directive is rendered fresh for every model call and is deliberately
/// NOT part of the transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Unique session ID
    pub id: SessionId,

    /// Ordered messages
    pub messages: Vec<Message>,

    /// When this transcript was created
    pub created_at: DateTime<Utc>,

    /// When the last message was added
    pub updated_at: DateTime<Utc>,
}

impl Transcript {
    /// Create a new empty transcript.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message.
    pub fn push(&mut self, message: Message) {
        self.updated_at = Utc::now();
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterate messages from newest to oldest.
    pub fn iter_newest_first(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().rev()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user("Hello, Drafter!");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello, Drafter!");
        assert!(msg.tool_calls.is_empty());
        assert!(msg.succeeded.is_none());
    }

    #[test]
    fn tool_result_carries_success_flag() {
        let ok = Message::tool_result("call_1", "done", true);
        assert_eq!(ok.role, Role::Tool);
        assert_eq!(ok.tool_call_id.as_deref(), Some("call_1"));
        assert!(ok.is_successful_tool_result());

        let failed = Message::tool_result("call_2", "❌ nope", false);
        assert!(!failed.is_successful_tool_result());
    }

    #[test]
    fn transcript_is_append_only_and_ordered() {
        let mut transcript = Transcript::new();
        let created = transcript.created_at;

        transcript.push(Message::user("first"));
        transcript.push(Message::assistant("second"));
        assert_eq!(transcript.len(), 2);
        assert!(transcript.updated_at >= created);

        let newest: Vec<_> = transcript
            .iter_newest_first()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(newest, vec!["second", "first"]);
    }

    #[test]
    fn message_serialization_roundtrip() {
        let msg = Message::tool_result("call_9", "✅ Document has been saved", true);
        let json = serde_json::to_string(&msg).unwrap();
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.role, Role::Tool);
        assert_eq!(deserialized.succeeded, Some(true));
    }
}

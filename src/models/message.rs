use serde::{Deserialize, Serialize};

use super::response::ToolCallPart;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One piece of message content. Tool results travel inside user-role messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessagePart {
    Text { text: String },
    ToolCall(ToolCallPart),
    ToolResult { call_id: String, content: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Vec<MessagePart>,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self::text(Role::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::text(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::text(Role::Assistant, text)
    }

    fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: vec![MessagePart::Text { text: text.into() }],
        }
    }

    /// Assistant message carrying the tool calls requested in one round.
    pub fn tool_calls(calls: Vec<ToolCallPart>) -> Self {
        Self {
            role: Role::Assistant,
            content: calls.into_iter().map(MessagePart::ToolCall).collect(),
        }
    }

    pub fn tool_result(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![MessagePart::ToolResult {
                call_id: call_id.into(),
                content: content.into(),
            }],
        }
    }

    /// Concatenated text parts, ignoring tool calls and results.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                MessagePart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// True for a user message that carries no tool results.
    pub fn is_plain_user(&self) -> bool {
        self.role == Role::User
            && self
                .content
                .iter()
                .all(|part| matches!(part, MessagePart::Text { .. }))
    }
}

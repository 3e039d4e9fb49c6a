//! Conversation message types

use serde::{Deserialize, Serialize};

use super::tool::ToolCall;

/// A single entry in the conversation log.
///
/// The conversation is an append-only sequence of these. The first
/// entry is always `System`; `ToolResult` entries answer the tool
/// calls of the immediately preceding `Assistant` entry, one result
/// per call id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Message {
    /// The fixed system directive. Exactly one, always first.
    System { text: String },
    /// A user turn.
    User { text: String },
    /// A model reply. `tool_calls` is empty for a terminal reply and
    /// non-empty for a tool-requesting reply (text may be empty then).
    Assistant {
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    /// The serialized result of exactly one prior tool call.
    ToolResult { call_id: String, payload: String },
}

impl Message {
    /// Create the system directive message
    pub fn system(text: impl Into<String>) -> Self {
        Message::System { text: text.into() }
    }

    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Message::User { text: text.into() }
    }

    /// Create a terminal assistant reply (no tool calls)
    pub fn assistant(text: impl Into<String>) -> Self {
        Message::Assistant {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Create a tool-requesting assistant reply
    pub fn assistant_with_calls(text: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Message::Assistant {
            text: text.into(),
            tool_calls,
        }
    }

    /// Create a tool result message
    pub fn tool_result(call_id: impl Into<String>, payload: impl Into<String>) -> Self {
        Message::ToolResult {
            call_id: call_id.into(),
            payload: payload.into(),
        }
    }

    /// Whether this entry is protocol scaffolding: required in the log
    /// and in every model invocation, but never shown to the user.
    pub fn is_scaffolding(&self) -> bool {
        match self {
            Message::ToolResult { .. } => true,
            Message::Assistant { tool_calls, .. } => !tool_calls.is_empty(),
            Message::System { .. } | Message::User { .. } => false,
        }
    }
}

/// Role of a rendered conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// Display projection of a message: what a chat front-end renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedTurn {
    pub role: TurnRole,
    pub text: String,
}

//! Model client trait definition

use std::time::Duration;

use async_trait::async_trait;

use super::error::ModelResult;
use crate::types::{Message, ToolCall, ToolSpec};

/// Default deadline for a single model invocation
pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings for the backing model endpoint
#[derive(Debug, Clone)]
pub struct ModelSettings {
    /// Model identifier as used by the provider's API
    pub model: String,
    /// API key for authentication
    pub api_key: Option<String>,
    /// Temperature for response generation
    pub temperature: Option<f32>,
    /// Deadline for a single invocation
    pub timeout: Duration,
}

impl ModelSettings {
    /// Create settings for a model with defaults
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: None,
            temperature: None,
            timeout: DEFAULT_MODEL_TIMEOUT,
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the invocation deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// One model reply: text plus zero or more tool-call requests
#[derive(Debug, Clone, Default)]
pub struct AssistantReply {
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
}

impl AssistantReply {
    /// A terminal text reply
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }

    /// A tool-requesting reply
    pub fn with_calls(text: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            text: text.into(),
            tool_calls,
        }
    }
}

/// The two request shapes against the language model.
///
/// Both are blocking remote calls from the loop's perspective. The
/// invoker does not validate tool names or deduplicate call ids; that
/// is the dispatcher's job.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send the full history plus the tool descriptor set; the model
    /// may return a reply with zero or more tool-call requests.
    async fn invoke_with_tools(
        &self,
        history: &[Message],
        tools: &[ToolSpec],
    ) -> ModelResult<AssistantReply>;

    /// Send the full history without tool definitions. Always returns
    /// an empty `tool_calls`: with no tools offered, any tool-call
    /// intent is dropped by contract (and flagged by the
    /// implementation for observability).
    async fn invoke_plain(&self, history: &[Message]) -> ModelResult<AssistantReply>;
}

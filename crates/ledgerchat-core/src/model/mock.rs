//! Mock model for testing
//!
//! Provides deterministic, configurable replies without network
//! dependencies. Useful for exercising the orchestration loop and the
//! dispatcher in tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::error::{ModelError, ModelResult};
use super::traits::{AssistantReply, ModelClient};
use crate::types::{Message, ToolSpec};

/// Scripted model: pops one reply per invocation, echoes the last user
/// message once the script runs out.
pub struct MockModel {
    script: Mutex<VecDeque<AssistantReply>>,
    fail_message: Option<String>,
    delay_ms: u64,
}

impl MockModel {
    /// Replies served in order, one per invocation
    pub fn scripted(replies: Vec<AssistantReply>) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            fail_message: None,
            delay_ms: 0,
        }
    }

    /// Echo the last user message on every invocation
    pub fn echo() -> Self {
        Self::scripted(Vec::new())
    }

    /// Fail every invocation with `ModelError::Unavailable`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fail_message: Some(message.into()),
            delay_ms: 0,
        }
    }

    /// Delay each invocation, for exercising busy-turn rejection
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    async fn next_reply(&self, history: &[Message]) -> ModelResult<AssistantReply> {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }

        if let Some(message) = &self.fail_message {
            return Err(ModelError::Unavailable(message.clone()));
        }

        let scripted = self
            .script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();
        Ok(scripted.unwrap_or_else(|| {
            let last_user = history
                .iter()
                .rev()
                .find_map(|m| match m {
                    Message::User { text } => Some(text.as_str()),
                    _ => None,
                })
                .unwrap_or("Hello from MockModel!");
            AssistantReply::text(format!("Echo: {}", last_user))
        }))
    }
}

#[async_trait]
impl ModelClient for MockModel {
    async fn invoke_with_tools(
        &self,
        history: &[Message],
        _tools: &[ToolSpec],
    ) -> ModelResult<AssistantReply> {
        self.next_reply(history).await
    }

    async fn invoke_plain(&self, history: &[Message]) -> ModelResult<AssistantReply> {
        let reply = self.next_reply(history).await?;
        // Same contract as the production invoker: no tools were
        // offered, so any scripted tool calls are dropped.
        Ok(AssistantReply {
            text: reply.text,
            tool_calls: Vec::new(),
        })
    }
}

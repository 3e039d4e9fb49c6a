//! The per-conversation orchestration loop

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::dispatch::ToolDispatcher;
use crate::history::MessageHistory;
use crate::logging::Logger;
use crate::model::{ModelClient, ModelError};
use crate::tools::ToolRegistry;
use crate::types::{Message, RenderedTurn};

/// Turn-level failures surfaced to the caller
#[derive(Error, Debug)]
pub enum TurnError {
    /// A previous turn for this session is still running. The new
    /// input is rejected rather than queued or raced.
    #[error("a turn is already in progress")]
    TurnInProgress,

    /// A model invocation failed. History is left consistent and the
    /// caller may resubmit.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// One conversation: registry handle, model invoker, dispatcher and
/// the message history, constructed once and passed around explicitly.
///
/// The loop is strictly sequential per session; the history mutex is
/// held for the whole turn and a concurrent `send` is rejected. The
/// registry is read-only and may be shared across sessions.
pub struct Session {
    registry: Arc<ToolRegistry>,
    model: Arc<dyn ModelClient>,
    dispatcher: ToolDispatcher,
    history: Mutex<MessageHistory>,
    logger: Arc<dyn Logger>,
}

impl Session {
    /// Create a session seeded with the system directive
    pub fn new(
        registry: Arc<ToolRegistry>,
        model: Arc<dyn ModelClient>,
        system_prompt: impl Into<String>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        let dispatcher = ToolDispatcher::new(Arc::clone(&registry), Arc::clone(&logger));
        Self {
            registry,
            model,
            dispatcher,
            history: Mutex::new(MessageHistory::new(system_prompt)),
            logger,
        }
    }

    /// Bound concurrent tool invocations within one turn
    pub fn with_tool_concurrency(mut self, limit: usize) -> Self {
        self.dispatcher = self.dispatcher.with_concurrency(limit);
        self
    }

    /// Run one full turn: user input in, final assistant text out.
    ///
    /// At most one round of tool calls per turn; a reply produced
    /// after tool results is never re-inspected for further calls.
    pub async fn send(&self, user_text: impl Into<String>) -> Result<String, TurnError> {
        let mut history = self
            .history
            .try_lock()
            .map_err(|_| TurnError::TurnInProgress)?;

        history.append(Message::user(user_text.into()));

        let specs = self.registry.specs();
        let first = self
            .model
            .invoke_with_tools(history.snapshot(), &specs)
            .await?;

        if first.tool_calls.is_empty() {
            history.append(Message::assistant(first.text.clone()));
            return Ok(first.text);
        }

        self.logger.info(&format!(
            "[Session] Model requested {} tool call(s)",
            first.tool_calls.len()
        ));

        // Stage the scaffolding locally and commit it only after the
        // finalizing call succeeds: a failed or cancelled turn must
        // never leave a tool-requesting reply in history without its
        // matching results.
        let mut staged = Vec::with_capacity(first.tool_calls.len() + 1);
        staged.push(Message::assistant_with_calls(
            first.text,
            first.tool_calls.clone(),
        ));
        staged.extend(self.dispatcher.dispatch(&first.tool_calls).await);

        let mut context: Vec<Message> = history.snapshot().to_vec();
        context.extend(staged.iter().cloned());

        let reply = self.model.invoke_plain(&context).await?;

        for message in staged {
            history.append(message);
        }
        // The final reply is always committed as a plain assistant
        // message; invoke_plain already forces tool_calls empty.
        history.append(Message::assistant(reply.text.clone()));

        Ok(reply.text)
    }

    /// Display projection of the conversation so far
    pub async fn renderable(&self) -> Vec<RenderedTurn> {
        self.history.lock().await.renderable()
    }

    /// Full conversation log, scaffolding included
    pub async fn messages(&self) -> Vec<Message> {
        self.history.lock().await.snapshot().to_vec()
    }

    /// The shared tool registry
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::model::{AssistantReply, MockModel, ModelResult};
    use crate::tools::{ToolDescriptor, ToolInvokeError, ToolInvoker};
    use crate::types::{ToolCall, ToolSpec, TurnRole};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::time::Duration;

    struct StaticTool {
        response: String,
        delay_ms: u64,
    }

    #[async_trait]
    impl ToolInvoker for StaticTool {
        async fn invoke(&self, _name: &str, _arguments: Value) -> Result<String, ToolInvokeError> {
            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }
            Ok(self.response.clone())
        }
    }

    /// Model double whose invocations yield pre-set outcomes,
    /// including failures partway through a turn.
    struct OutcomeModel {
        outcomes: std::sync::Mutex<VecDeque<ModelResult<AssistantReply>>>,
    }

    impl OutcomeModel {
        fn new(outcomes: Vec<ModelResult<AssistantReply>>) -> Self {
            Self {
                outcomes: std::sync::Mutex::new(outcomes.into()),
            }
        }

        fn next(&self) -> ModelResult<AssistantReply> {
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(AssistantReply::text("out of script")))
        }
    }

    #[async_trait]
    impl ModelClient for OutcomeModel {
        async fn invoke_with_tools(
            &self,
            _history: &[Message],
            _tools: &[ToolSpec],
        ) -> ModelResult<AssistantReply> {
            self.next()
        }

        async fn invoke_plain(&self, _history: &[Message]) -> ModelResult<AssistantReply> {
            let reply = self.next()?;
            Ok(AssistantReply {
                text: reply.text,
                tool_calls: Vec::new(),
            })
        }
    }

    fn test_logger() -> Arc<dyn Logger> {
        Arc::new(NoOpLogger::new())
    }

    fn descriptor(name: &str, response: &str, delay_ms: u64) -> ToolDescriptor {
        ToolDescriptor::new(
            name,
            "a test tool",
            json!({"type": "object"}),
            "tracker",
            Arc::new(StaticTool {
                response: response.to_string(),
                delay_ms,
            }),
        )
    }

    fn registry_with(descriptors: Vec<ToolDescriptor>) -> Arc<ToolRegistry> {
        Arc::new(ToolRegistry::from_descriptors(descriptors, test_logger()).unwrap())
    }

    fn empty_registry() -> Arc<ToolRegistry> {
        registry_with(Vec::new())
    }

    #[tokio::test]
    async fn test_plain_turn_round_trip() {
        let model = Arc::new(MockModel::scripted(vec![AssistantReply::text("hi there")]));
        let session = Session::new(empty_registry(), model, "directive", test_logger());

        let reply = session.send("hello").await.unwrap();
        assert_eq!(reply, "hi there");

        // Exactly one new rendered assistant entry, no scaffolding
        let rendered = session.renderable().await;
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].role, TurnRole::User);
        assert_eq!(rendered[1].role, TurnRole::Assistant);
        assert_eq!(session.messages().await.len(), 3);
    }

    #[tokio::test]
    async fn test_tool_turn_folds_results_and_finalizes() {
        let registry = registry_with(vec![descriptor(
            "add_expense",
            "{\"status\":\"success\",\"id\":\"42\"}",
            0,
        )]);
        let call = ToolCall::new("c1", "add_expense", json!({"amount": 12.5, "category": "Food"}));
        let model = Arc::new(MockModel::scripted(vec![
            AssistantReply::with_calls("", vec![call]),
            AssistantReply::text("Added expense 42."),
        ]));
        let session = Session::new(registry, model, "directive", test_logger());

        let reply = session.send("lunch was 12.5 on food").await.unwrap();
        assert_eq!(reply, "Added expense 42.");

        let messages = session.messages().await;
        assert_eq!(messages.len(), 5);
        assert!(matches!(&messages[2], Message::Assistant { tool_calls, .. } if tool_calls.len() == 1));
        match &messages[3] {
            Message::ToolResult { call_id, payload } => {
                assert_eq!(call_id, "c1");
                assert!(payload.contains("success"));
            }
            other => panic!("expected tool result, got {:?}", other),
        }
        assert!(matches!(&messages[4], Message::Assistant { tool_calls, .. } if tool_calls.is_empty()));

        // Only the user turn and the final reply render
        let rendered = session.renderable().await;
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[1].text, "Added expense 42.");
    }

    #[tokio::test]
    async fn test_unknown_tool_still_finalizes() {
        let call = ToolCall::new("c2", "unknown_tool", json!({}));
        let model = Arc::new(MockModel::scripted(vec![
            AssistantReply::with_calls("", vec![call]),
            AssistantReply::text("That tool doesn't exist."),
        ]));
        let session = Session::new(empty_registry(), model, "directive", test_logger());

        let reply = session.send("do something odd").await.unwrap();
        assert_eq!(reply, "That tool doesn't exist.");

        let messages = session.messages().await;
        match &messages[3] {
            Message::ToolResult { call_id, payload } => {
                assert_eq!(call_id, "c2");
                let payload: Value = serde_json::from_str(payload).unwrap();
                assert_eq!(payload["kind"], "not_found");
            }
            other => panic!("expected tool result, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_result_append_order_matches_request_order() {
        let registry = registry_with(vec![
            descriptor("slow_tool", "{\"n\":1}", 50),
            descriptor("fast_tool", "{\"n\":2}", 0),
        ]);
        let model = Arc::new(MockModel::scripted(vec![
            AssistantReply::with_calls(
                "",
                vec![
                    ToolCall::new("c1", "slow_tool", json!({})),
                    ToolCall::new("c2", "fast_tool", json!({})),
                ],
            ),
            AssistantReply::text("both done"),
        ]));
        let session = Session::new(registry, model, "directive", test_logger());

        session.send("run both").await.unwrap();

        let messages = session.messages().await;
        let ids: Vec<&str> = messages
            .iter()
            .filter_map(|m| match m {
                Message::ToolResult { call_id, .. } => Some(call_id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec!["c1", "c2"]);
    }

    #[tokio::test]
    async fn test_concurrent_send_is_rejected() {
        let model = Arc::new(MockModel::scripted(vec![AssistantReply::text("slow reply")]).with_delay(200));
        let session = Arc::new(Session::new(empty_registry(), model, "directive", test_logger()));

        let background = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.send("first").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let second = session.send("second").await;
        assert!(matches!(second, Err(TurnError::TurnInProgress)));

        let first = background.await.unwrap().unwrap();
        assert_eq!(first, "slow reply");
    }

    #[tokio::test]
    async fn test_model_failure_leaves_history_consistent() {
        let model = Arc::new(MockModel::failing("connection refused"));
        let session = Session::new(empty_registry(), model, "directive", test_logger());

        let result = session.send("hello").await;
        assert!(matches!(result, Err(TurnError::Model(_))));

        // The user turn is in the log; nothing dangling
        let messages = session.messages().await;
        assert_eq!(messages.len(), 2);
        assert!(matches!(&messages[1], Message::User { .. }));
    }

    #[tokio::test]
    async fn test_finalize_failure_discards_staged_scaffolding() {
        let registry = registry_with(vec![descriptor("add_expense", "{\"status\":\"success\"}", 0)]);
        let call = ToolCall::new("c1", "add_expense", json!({"amount": 1}));
        let model = Arc::new(OutcomeModel::new(vec![
            Ok(AssistantReply::with_calls("", vec![call])),
            Err(ModelError::Unavailable("connection reset".to_string())),
        ]));
        let session = Session::new(registry, model, "directive", test_logger());

        let result = session.send("add it").await;
        assert!(matches!(result, Err(TurnError::Model(_))));

        // No tool-requesting reply is stranded without its results
        let messages = session.messages().await;
        assert_eq!(messages.len(), 2);
        assert!(!messages.iter().any(Message::is_scaffolding));

        // The session remains usable for a resubmitted turn
        let reply = session.send("add it again").await.unwrap();
        assert_eq!(reply, "out of script");
    }
}

//! GenaiModel - model invoker using the genai crate
//!
//! Handles all genai-supported model APIs (Gemini, OpenAI, Anthropic,
//! etc.) through one non-streaming request path. Auth flows through an
//! explicit resolver fed by our configuration, not genai's default env
//! var lookup.

use std::sync::Arc;

use async_trait::async_trait;
use genai::chat::{
    ChatMessage as GenaiMessage, ChatOptions as GenaiOptions, ChatRequest,
    Tool as GenaiTool, ToolCall as GenaiToolCall, ToolResponse as GenaiToolResponse,
};
use genai::resolver::{AuthData, AuthResolver};
use genai::{Client, ModelIden};

use super::error::{ModelError, ModelResult};
use super::traits::{AssistantReply, ModelClient, ModelSettings};
use crate::logging::Logger;
use crate::types::{Message, ToolCall, ToolSpec};

/// Model invoker backed by the genai crate
pub struct GenaiModel {
    settings: ModelSettings,
    client: Client,
    logger: Arc<dyn Logger>,
}

impl GenaiModel {
    /// Create a new invoker; the genai client is built once
    pub fn new(settings: ModelSettings, logger: Arc<dyn Logger>) -> Self {
        let client = build_client(settings.api_key.clone());
        Self {
            settings,
            client,
            logger,
        }
    }

    fn chat_options(&self) -> GenaiOptions {
        let mut options = GenaiOptions::default();
        if let Some(temperature) = self.settings.temperature {
            options = options.with_temperature(temperature as f64);
        }
        options
    }

    async fn exec(&self, request: ChatRequest) -> ModelResult<AssistantReply> {
        let options = self.chat_options();
        let call = self
            .client
            .exec_chat(&self.settings.model, request, Some(&options));

        let response = match tokio::time::timeout(self.settings.timeout, call).await {
            Err(_) => return Err(ModelError::Timeout(self.settings.timeout)),
            Ok(Err(e)) => return Err(ModelError::Unavailable(e.to_string())),
            Ok(Ok(response)) => response,
        };

        let text = response.first_text().unwrap_or_default().to_string();
        let tool_calls = response
            .into_tool_calls()
            .into_iter()
            .map(|tc| ToolCall::new(tc.call_id, tc.fn_name, tc.fn_arguments))
            .collect();

        Ok(AssistantReply { text, tool_calls })
    }
}

#[async_trait]
impl ModelClient for GenaiModel {
    async fn invoke_with_tools(
        &self,
        history: &[Message],
        tools: &[ToolSpec],
    ) -> ModelResult<AssistantReply> {
        self.logger.info(&format!(
            "[GenaiModel] Tool-capable turn: model={}, {} tools bound",
            self.settings.model,
            tools.len()
        ));

        let mut request = ChatRequest::new(to_genai_messages(history));
        if !tools.is_empty() {
            request = request.with_tools(tools.iter().map(to_genai_tool).collect::<Vec<_>>());
        }

        self.exec(request).await
    }

    async fn invoke_plain(&self, history: &[Message]) -> ModelResult<AssistantReply> {
        self.logger.info(&format!(
            "[GenaiModel] Plain turn: model={}",
            self.settings.model
        ));

        let request = ChatRequest::new(to_genai_messages(history));
        let reply = self.exec(request).await?;

        // No tools were offered on this turn; drop any tool-call
        // intent by contract, but leave a trace for observability.
        if !reply.tool_calls.is_empty() {
            let names: Vec<&str> = reply.tool_calls.iter().map(|c| c.name.as_str()).collect();
            self.logger.warn(&format!(
                "[GenaiModel] Discarding tool-call intent on plain turn: {:?}",
                names
            ));
        }

        Ok(AssistantReply {
            text: reply.text,
            tool_calls: Vec::new(),
        })
    }
}

/// Build a genai client, wiring the configured API key through an
/// explicit auth resolver when one is set.
fn build_client(api_key: Option<String>) -> Client {
    match api_key {
        Some(key) => {
            let auth_resolver = AuthResolver::from_resolver_fn(
                move |_: ModelIden| -> Result<Option<AuthData>, genai::resolver::Error> {
                    Ok(Some(AuthData::from_single(key.clone())))
                },
            );
            Client::builder().with_auth_resolver(auth_resolver).build()
        }
        None => Client::default(),
    }
}

/// Convert our conversation log to genai messages
fn to_genai_messages(history: &[Message]) -> Vec<GenaiMessage> {
    history
        .iter()
        .map(|message| match message {
            Message::System { text } => GenaiMessage::system(text.clone()),
            Message::User { text } => GenaiMessage::user(text.clone()),
            Message::Assistant { text, tool_calls } => {
                if tool_calls.is_empty() {
                    GenaiMessage::assistant(text.clone())
                } else {
                    let calls: Vec<GenaiToolCall> = tool_calls
                        .iter()
                        .map(|tc| GenaiToolCall {
                            call_id: tc.id.clone(),
                            fn_name: tc.name.clone(),
                            fn_arguments: tc.arguments.clone(),
                            thought_signatures: None,
                        })
                        .collect();
                    GenaiMessage::from(calls)
                }
            }
            Message::ToolResult { call_id, payload } => {
                GenaiMessage::from(GenaiToolResponse::new(call_id.clone(), payload.clone()))
            }
        })
        .collect()
}

/// Convert a tool spec to a genai tool
fn to_genai_tool(spec: &ToolSpec) -> GenaiTool {
    let mut tool = GenaiTool::new(&spec.name).with_description(&spec.description);
    if let Some(schema) = &spec.input_schema {
        tool = tool.with_schema(schema.clone());
    }
    tool
}

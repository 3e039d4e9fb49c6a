//! Batch execution of tool calls

use std::sync::Arc;

use futures::StreamExt;

use crate::logging::Logger;
use crate::tools::{RegistryError, ToolRegistry};
use crate::types::{Message, ToolCall};

/// Default bound on concurrent tool invocations per batch
pub const DEFAULT_TOOL_CONCURRENCY: usize = 4;

/// Executes batches of tool calls against the registry.
///
/// Every request yields exactly one `ToolResult` message: resolution
/// and execution failures are encoded as error payloads the model can
/// read, never propagated, so a single bad call cannot abort the
/// batch. Requests run concurrently up to the configured limit, but
/// results are emitted in request order regardless of completion
/// order.
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    concurrency: usize,
    logger: Arc<dyn Logger>,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>, logger: Arc<dyn Logger>) -> Self {
        Self {
            registry,
            concurrency: DEFAULT_TOOL_CONCURRENCY,
            logger,
        }
    }

    /// Bound the number of in-flight tool invocations per batch
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit.max(1);
        self
    }

    /// Execute a batch of tool calls, one `ToolResult` per request, in
    /// request order.
    pub async fn dispatch(&self, calls: &[ToolCall]) -> Vec<Message> {
        // `buffered` polls up to `concurrency` futures at once and
        // yields outputs in input order.
        futures::stream::iter(calls.to_vec())
            .map(|call| self.execute(call))
            .buffered(self.concurrency)
            .collect()
            .await
    }

    /// Execute one call, folding every failure into the payload
    async fn execute(&self, call: ToolCall) -> Message {
        let descriptor = match self.registry.resolve(&call.name) {
            Ok(descriptor) => descriptor,
            Err(e @ RegistryError::NotFound(_)) => {
                return Message::tool_result(call.id, error_payload("not_found", &e.to_string()));
            }
            Err(e) => {
                // resolve only returns NotFound, but stay exhaustive
                return Message::tool_result(call.id, error_payload("registry", &e.to_string()));
            }
        };

        self.logger.info(&format!(
            "[ToolDispatcher] Executing {} (call {})",
            call.name, call.id
        ));

        match descriptor.invoke(call.decoded_arguments()).await {
            Ok(payload) => Message::tool_result(call.id, payload),
            Err(e) => {
                self.logger.warn(&format!(
                    "[ToolDispatcher] Tool {} failed (call {}): {}",
                    call.name, call.id, e
                ));
                Message::tool_result(call.id, error_payload("execution_error", &e.to_string()))
            }
        }
    }
}

/// Structured error payload the model can see and react to
fn error_payload(kind: &str, message: &str) -> String {
    serde_json::json!({
        "status": "error",
        "kind": kind,
        "message": message,
    })
    .to_string()
}

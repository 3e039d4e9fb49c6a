//! Tool dispatch module
//!
//! Executes a batch of model-requested tool calls against the registry
//! and produces one correlated tool-result message per request, in
//! request order.

mod dispatcher;

pub use dispatcher::{ToolDispatcher, DEFAULT_TOOL_CONCURRENCY};

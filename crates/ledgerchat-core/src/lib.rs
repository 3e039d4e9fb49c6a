//! LedgerChat Core
//!
//! Tool-calling chat orchestration over MCP.
//! This crate owns the whole conversation loop: discover tools from
//! remote MCP providers, hand their specs to a language model, execute
//! the tool calls the model requests, fold the results back into the
//! conversation and return the final reply.
//!
//! ```rust,ignore
//! use ledgerchat_core::config::Settings;
//! use ledgerchat_core::model::GenaiModel;
//! use ledgerchat_core::session::Session;
//! use ledgerchat_core::tools::ToolRegistry;
//!
//! let settings = Settings::from_env()?;
//! let registry = Arc::new(ToolRegistry::discover(&settings.providers, logger.clone()).await?);
//! let model = Arc::new(GenaiModel::new(settings.model_settings(), logger.clone()));
//!
//! let session = Session::new(registry, model, settings.system_prompt, logger);
//! let reply = session.send("lunch was 12.50 on food").await?;
//! ```

pub mod config;
pub mod dispatch;
pub mod history;
pub mod logging;
pub mod mcp;
pub mod model;
pub mod session;
pub mod tools;
pub mod types;

// Re-export commonly used types
pub use types::{Message, RenderedTurn, ToolCall, ToolSpec, TurnRole};

pub use config::{ConfigError, Settings};

pub use history::MessageHistory;

pub use logging::{ConsoleLogger, Logger, NoOpLogger};

pub use model::{AssistantReply, GenaiModel, MockModel, ModelClient, ModelError, ModelSettings};

pub use tools::{
    McpToolInvoker, ProviderConfig, RegistryError, ToolDescriptor, ToolInvokeError, ToolInvoker,
    ToolRegistry,
};

pub use dispatch::{ToolDispatcher, DEFAULT_TOOL_CONCURRENCY};

pub use session::{Session, TurnError};

// MCP client using the official rmcp SDK
pub use mcp::{McpClient, McpError, McpResult};

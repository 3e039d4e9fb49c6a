//! MCP (Model Context Protocol) client module
//!
//! Uses the official rmcp SDK to connect to remote tool providers over
//! streamable HTTP. A provider may itself be a pass-through proxy to
//! another upstream endpoint; the contract is identical either way.
//!
//! # Example
//!
//! ```rust,ignore
//! use ledgerchat_core::mcp::McpClient;
//! use std::sync::Arc;
//!
//! let logger: Arc<dyn Logger> = Arc::new(NoOpLogger::new());
//!
//! let client = McpClient::connect_http("https://example.com/mcp", logger).await?;
//!
//! // List available tools
//! let tools = client.list_tools().await?;
//!
//! // Call a tool
//! let result = client.call_tool("add_expense", json!({
//!     "amount": 12.5,
//!     "category": "Food"
//! })).await?;
//! ```

mod client;

pub use client::{McpClient, McpError, McpResult};

// Re-export rmcp types that consumers might need
pub use rmcp::model::{CallToolResult as McpToolResult, Tool as McpTool};

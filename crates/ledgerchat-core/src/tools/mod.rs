//! Tool registry module
//!
//! Discovers the callable tools from configured remote providers at
//! startup and exposes a stable, name-keyed lookup for the dispatcher.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  ToolRegistry                               │
//! │                                             │
//! │  - Fetches tools via MCP tools/list         │
//! │  - Rejects duplicate tool names at startup  │
//! │  - Provides tool specs to the model         │
//! │  - Resolves names for the dispatcher        │
//! └─────────────────────────────────────────────┘
//!           │
//!           │ MCP (tools/list, tools/call)
//!           ▼
//! ┌─────────────────────────────────────────────┐
//! │  Remote providers (direct or proxy)         │
//! │                                             │
//! │  e.g. the expense tracker:                  │
//! │    - add_expense, list_expenses             │
//! └─────────────────────────────────────────────┘
//! ```

mod registry;

pub use registry::{
    McpToolInvoker, ProviderConfig, RegistryError, ToolDescriptor, ToolInvokeError, ToolInvoker,
    ToolRegistry,
};

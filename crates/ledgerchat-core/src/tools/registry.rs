//! Tool registry: discovery, lookup and the invoke capability
//!
//! The registry is built once at startup from the configured remote
//! providers and is read-only afterwards, so it can be shared across
//! sessions behind an `Arc` without locking.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::logging::Logger;
use crate::mcp::McpClient;
use crate::types::ToolSpec;

/// A remote tool provider endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Display name, used in logs and duplicate diagnostics
    pub name: String,
    /// Streamable HTTP endpoint URL
    pub url: String,
}

impl ProviderConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Registry construction and lookup errors
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A configured provider could not be reached or queried. Fatal at
    /// startup: the loop cannot reason about a tool it cannot resolve,
    /// so no partial registry is built.
    #[error("provider '{provider}' unreachable at {url}: {reason}")]
    ProviderUnreachable {
        provider: String,
        url: String,
        reason: String,
    },

    /// Two providers exposed identically named tools. Fatal at
    /// startup: a silent shadow would make dispatch provider-dependent
    /// in a way the model cannot see.
    #[error("duplicate tool name '{name}' from providers '{first}' and '{second}'")]
    DuplicateToolName {
        name: String,
        first: String,
        second: String,
    },

    /// A dispatched tool name has no registry entry.
    #[error("tool not found: {0}")]
    NotFound(String),
}

/// Execution failures reported by a tool's invoke capability
#[derive(Error, Debug)]
pub enum ToolInvokeError {
    /// The provider could not be called at all
    #[error("transport failure: {0}")]
    Transport(String),

    /// The provider ran the tool and reported an error result
    #[error("{0}")]
    Execution(String),
}

/// Capability mapping tool arguments to a serialized result.
///
/// The production implementation calls out over MCP; tests substitute
/// in-process implementations.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    async fn invoke(&self, name: &str, arguments: Value) -> Result<String, ToolInvokeError>;
}

/// `ToolInvoker` backed by a connected MCP client
pub struct McpToolInvoker {
    client: Arc<McpClient>,
}

impl McpToolInvoker {
    pub fn new(client: Arc<McpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolInvoker for McpToolInvoker {
    async fn invoke(&self, name: &str, arguments: Value) -> Result<String, ToolInvokeError> {
        use rmcp::model::RawContent;

        let result = self
            .client
            .call_tool(name, arguments)
            .await
            .map_err(|e| ToolInvokeError::Transport(e.to_string()))?;

        // Flatten the text content of the MCP result.
        // Content is Annotated<RawContent>; .raw holds the RawContent.
        let text = result
            .content
            .iter()
            .filter_map(|c| match &c.raw {
                RawContent::Text(t) => Some(t.text.clone()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        if result.is_error.unwrap_or(false) {
            Err(ToolInvokeError::Execution(text))
        } else {
            Ok(text)
        }
    }
}

/// A registered tool: its advertised shape plus the invoke capability
#[derive(Clone)]
pub struct ToolDescriptor {
    /// Tool name, unique across the registry
    pub name: String,
    /// Tool description
    pub description: String,
    /// JSON Schema for the input parameters
    pub input_schema: Value,
    /// Name of the provider that advertised this tool
    pub provider: String,
    /// Invoke capability
    invoker: Arc<dyn ToolInvoker>,
}

impl ToolDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
        provider: impl Into<String>,
        invoker: Arc<dyn ToolInvoker>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            provider: provider.into(),
            invoker,
        }
    }

    /// The shape handed to the model for function calling
    pub fn spec(&self) -> ToolSpec {
        ToolSpec::new(&self.name, &self.description).with_schema(self.input_schema.clone())
    }

    /// Execute this tool with already-decoded arguments
    pub async fn invoke(&self, arguments: Value) -> Result<String, ToolInvokeError> {
        self.invoker.invoke(&self.name, arguments).await
    }
}

impl std::fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("provider", &self.provider)
            .finish()
    }
}

/// Name-keyed set of callable tools, immutable after discovery
pub struct ToolRegistry {
    /// Descriptors in discovery order (deterministic spec ordering)
    descriptors: Vec<ToolDescriptor>,
    /// Name -> position in `descriptors`
    index: HashMap<String, usize>,
    /// Logger
    logger: Arc<dyn Logger>,
}

impl ToolRegistry {
    /// Connect to each configured provider in order, list its tools
    /// and merge them into one registry.
    pub async fn discover(
        providers: &[ProviderConfig],
        logger: Arc<dyn Logger>,
    ) -> Result<Self, RegistryError> {
        let mut descriptors = Vec::new();

        for provider in providers {
            let unreachable = |reason: String| RegistryError::ProviderUnreachable {
                provider: provider.name.clone(),
                url: provider.url.clone(),
                reason,
            };

            let client = McpClient::connect_http(&provider.url, logger.clone())
                .await
                .map_err(|e| unreachable(e.to_string()))?;

            let listed = client
                .list_tools()
                .await
                .map_err(|e| unreachable(e.to_string()))?;

            logger.info(&format!(
                "[ToolRegistry] Discovered {} tools from provider '{}'",
                listed.len(),
                provider.name
            ));

            let client = Arc::new(client);
            for tool in listed {
                descriptors.push(ToolDescriptor::new(
                    tool.name.to_string(),
                    tool.description.map(|s| s.to_string()).unwrap_or_default(),
                    // input_schema is Arc<JsonObject>, convert to Value
                    serde_json::to_value(tool.input_schema.as_ref()).unwrap_or_default(),
                    provider.name.clone(),
                    Arc::new(McpToolInvoker::new(Arc::clone(&client))),
                ));
            }
        }

        Self::from_descriptors(descriptors, logger)
    }

    /// Build a registry from pre-constructed descriptors, applying the
    /// same duplicate-name check as discovery. Used for embedding and
    /// for tests.
    pub fn from_descriptors(
        descriptors: Vec<ToolDescriptor>,
        logger: Arc<dyn Logger>,
    ) -> Result<Self, RegistryError> {
        let mut index = HashMap::new();
        for (pos, descriptor) in descriptors.iter().enumerate() {
            if let Some(&existing) = index.get(&descriptor.name) {
                let first: &ToolDescriptor = &descriptors[existing];
                return Err(RegistryError::DuplicateToolName {
                    name: descriptor.name.clone(),
                    first: first.provider.clone(),
                    second: descriptor.provider.clone(),
                });
            }
            index.insert(descriptor.name.clone(), pos);
        }

        logger.info(&format!(
            "[ToolRegistry] Registry ready with {} tools",
            descriptors.len()
        ));

        Ok(Self {
            descriptors,
            index,
            logger,
        })
    }

    /// Look up a tool by name
    pub fn resolve(&self, name: &str) -> Result<&ToolDescriptor, RegistryError> {
        match self.index.get(name) {
            Some(&pos) => Ok(&self.descriptors[pos]),
            None => {
                self.logger
                    .warn(&format!("[ToolRegistry] Unknown tool requested: {}", name));
                Err(RegistryError::NotFound(name.to_string()))
            }
        }
    }

    /// Tool specs for binding to the model, in discovery order
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.descriptors.iter().map(ToolDescriptor::spec).collect()
    }

    /// Registered tool names, in discovery order
    pub fn names(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.name.as_str()).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

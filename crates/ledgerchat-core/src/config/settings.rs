//! Environment-backed settings

use std::time::Duration;

use thiserror::Error;

use crate::dispatch::DEFAULT_TOOL_CONCURRENCY;
use crate::model::{ModelSettings, DEFAULT_MODEL_TIMEOUT};
use crate::tools::ProviderConfig;

/// Model identifier used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Sampling temperature used when none is configured
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default remote tool provider
pub const DEFAULT_PROVIDER_NAME: &str = "Expense Tracker Proxy";
pub const DEFAULT_PROVIDER_URL: &str =
    "https://mcp-expense-tracker-supabase.fastmcp.app/mcp";

/// System directive seeded into every new conversation
pub const DEFAULT_SYSTEM_PROMPT: &str = "You have access to tools. When you choose to \
    call a tool, do not narrate status updates. After tools run, return only a concise \
    final answer.";

/// Configuration failures; all fatal at startup
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}'")]
    InvalidNumber { var: String, value: String },

    #[error("invalid server entry '{0}', expected name=url")]
    InvalidServerSpec(String),
}

/// Fully resolved runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub system_prompt: String,
    pub providers: Vec<ProviderConfig>,
    pub model_timeout: Duration,
    pub tool_concurrency: usize,
}

impl Settings {
    /// Resolve settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolve settings from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let temperature = match lookup("LEDGERCHAT_TEMPERATURE") {
            Some(raw) => raw.parse::<f32>().map_err(|_| ConfigError::InvalidNumber {
                var: "LEDGERCHAT_TEMPERATURE".to_string(),
                value: raw,
            })?,
            None => DEFAULT_TEMPERATURE,
        };

        let model_timeout = match lookup("LEDGERCHAT_MODEL_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                    var: "LEDGERCHAT_MODEL_TIMEOUT_SECS".to_string(),
                    value: raw,
                })?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_MODEL_TIMEOUT,
        };

        let tool_concurrency = match lookup("LEDGERCHAT_TOOL_CONCURRENCY") {
            Some(raw) => raw.parse::<usize>().map_err(|_| ConfigError::InvalidNumber {
                var: "LEDGERCHAT_TOOL_CONCURRENCY".to_string(),
                value: raw,
            })?,
            None => DEFAULT_TOOL_CONCURRENCY,
        };

        let providers = match lookup("LEDGERCHAT_SERVERS") {
            Some(raw) => parse_servers(&raw)?,
            None => vec![ProviderConfig::new(DEFAULT_PROVIDER_NAME, DEFAULT_PROVIDER_URL)],
        };

        Ok(Self {
            model: lookup("LEDGERCHAT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key: lookup("GEMINI_API_KEY"),
            temperature,
            system_prompt: lookup("LEDGERCHAT_SYSTEM_PROMPT")
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            providers,
            model_timeout,
            tool_concurrency,
        })
    }

    /// Model-endpoint slice of the settings
    pub fn model_settings(&self) -> ModelSettings {
        let mut settings = ModelSettings::new(&self.model)
            .with_temperature(self.temperature)
            .with_timeout(self.model_timeout);
        if let Some(key) = &self.api_key {
            settings = settings.with_api_key(key);
        }
        settings
    }
}

/// Parse a comma-separated list of `name=url` provider entries
fn parse_servers(raw: &str) -> Result<Vec<ProviderConfig>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((name, url)) if !name.trim().is_empty() && !url.trim().is_empty() => {
                Ok(ProviderConfig::new(name.trim(), url.trim()))
            }
            _ => Err(ConfigError::InvalidServerSpec(entry.to_string())),
        })
        .collect()
}

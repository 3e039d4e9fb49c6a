//! Runtime configuration
//!
//! Settings are read from the process environment with defaults that
//! match the hosted expense-tracker deployment, so the client runs out
//! of the box against that endpoint.

mod settings;

pub use settings::{
    ConfigError, Settings, DEFAULT_MODEL, DEFAULT_PROVIDER_NAME, DEFAULT_PROVIDER_URL,
    DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE,
};

//! Model invocation error types

use std::time::Duration;
use thiserror::Error;

/// Errors from a single model invocation.
///
/// Neither case is retried here; retry policy belongs to the caller,
/// which can safely resubmit because history is only appended after a
/// successful invocation.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Transport-level failure reaching the model endpoint
    #[error("model unavailable: {0}")]
    Unavailable(String),

    /// The configured deadline elapsed before a response arrived
    #[error("model call timed out after {0:?}")]
    Timeout(Duration),
}

pub type ModelResult<T> = Result<T, ModelError>;

//! Model invocation module
//!
//! Wraps exactly two request shapes against the language model: a
//! tool-capable turn (tool specs bound, the model may request calls)
//! and a plain continuation turn (no tools bound, used to finalize
//! after tool results are folded in).

mod error;
mod genai_model;
mod mock;
mod traits;

pub use error::{ModelError, ModelResult};
pub use genai_model::GenaiModel;
pub use mock::MockModel;
pub use traits::{AssistantReply, ModelClient, ModelSettings, DEFAULT_MODEL_TIMEOUT};

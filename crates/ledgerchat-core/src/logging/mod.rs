//! Logging abstractions
//!
//! Runtime-agnostic logging used by every component. The front-end
//! picks the implementation: console for interactive debugging, no-op
//! for tests and quiet operation.

mod console;
mod noop;
mod traits;

pub use console::ConsoleLogger;
pub use noop::NoOpLogger;
pub use traits::{BoxedLogger, Logger, LoggerExt, SharedLogger};

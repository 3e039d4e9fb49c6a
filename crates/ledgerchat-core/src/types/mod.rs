//! Core types for the conversation and tool-call protocol
//!
//! This module contains the shared types threaded through every
//! component: conversation messages and tool-call shapes.

mod message;
mod tool;

pub use message::{Message, RenderedTurn, TurnRole};
pub use tool::{ToolCall, ToolSpec};

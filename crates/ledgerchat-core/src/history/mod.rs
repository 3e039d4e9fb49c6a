//! Conversation history
//!
//! Owns the append-only message log threaded through every model
//! invocation, and the display projection that hides protocol
//! scaffolding from the user.

mod conversation;

pub use conversation::MessageHistory;

//! Orchestration session
//!
//! The control flow tying history, model and dispatcher together per
//! user turn: decide whether the model wants tools, execute the batch,
//! fold results back in, finalize. One session per conversation; the
//! session object owns all per-conversation state explicitly.

mod session;

pub use session::{Session, TurnError};

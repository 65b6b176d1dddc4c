//! High-level streaming conversation client
//!
//! Wires a [`Transport`](chatlab_core::Transport) implementation, a
//! caller-owned [`Conversation`](chatlab_core::Conversation), and an optional
//! pricing table into a turn-taking API with incremental output.

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod client;
mod conversation;

pub use client::Client;
pub use conversation::ConverseStream;

/// Prelude module for convenient imports
pub mod prelude {
    pub use super::Client;
    pub use chatlab_core::{Conversation, Message, Role};
}

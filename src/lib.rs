//! ChatLab - streaming conversations against converse-style model endpoints
//!
//! This crate provides a type-safe client for conducting stateful, streamed
//! conversations with a remote chat-completion endpoint, with incremental
//! reconstruction of each assistant turn, caller-owned history, and
//! best-effort usage and cost accounting.
//!
//! # Quick Start
//!
//! ```no_run
//! use chatlab::client::Client;
//! use chatlab::providers::Bedrock;
//! use chatlab::Conversation;
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), chatlab::Error> {
//! let transport = Bedrock::with_api_key("your-api-key");
//! let client = Client::new(transport)
//!     .with_system("You are a friendly assistant")
//!     .with_temperature(0.5);
//!
//! let mut conversation = Conversation::new();
//! let mut stream = client.converse(&mut conversation, "Hello!").await?;
//! while let Some(fragment) = stream.next().await {
//!     print!("{}", fragment?);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// Re-export core types
pub use chatlab_core::*;

pub mod providers {
    //! Endpoint implementations
    pub use chatlab_providers::*;
}

pub mod pricing {
    //! Pricing table and cost estimation
    pub use chatlab_pricing::*;
}

pub mod client {
    //! High-level client API
    pub use chatlab_client::*;
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use chatlab_client::Client;
    pub use chatlab_core::{
        Conversation, Error, Message, ModelId, Role, StreamEvent, Transport, UsageRecord,
    };
    pub use chatlab_pricing::PricingTable;
}

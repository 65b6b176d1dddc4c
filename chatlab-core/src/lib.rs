//! Core traits and types for the ChatLab conversation library
//!
//! This crate provides the fundamental abstractions used throughout the
//! ChatLab ecosystem: the conversation data model, the streaming event
//! vocabulary, and the transport seam providers implement.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod transport;
pub mod types;

// Re-export commonly used items
pub use error::{Error, Result};
pub use transport::Transport;
pub use types::{
    conversation::Conversation,
    message::{ContentBlock, Message, Role},
    request::{
        AdditionalModelFields, ConverseRequest, ConverseRequestBuilder, InferenceConfig, ModelId,
    },
    response::{ConverseOutput, UsageRecord},
    stream::{ContentDelta, StopReason, StreamEvent, StreamMetadata, StreamMetrics, TokenUsage},
};

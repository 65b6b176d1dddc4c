//! Endpoint implementations for the ChatLab conversation library

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod error;
pub mod http;
pub mod traits;

// Provider implementations
pub mod bedrock;

// Re-export provider types
pub use bedrock::Bedrock;

// Re-export common traits
pub use traits::{RequestConverter, ResponseParser, StreamEventParser};

//! Bedrock-runtime style provider

pub mod config;
pub mod converter;
pub mod parser;
pub mod provider;
pub mod stream;

pub use config::BedrockConfig;
pub use provider::Bedrock;
pub use stream::BedrockStream;

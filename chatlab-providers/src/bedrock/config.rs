//! Bedrock provider configuration

use crate::constants::{BEDROCK_API_KEY_ENV, BEDROCK_DEFAULT_BASE_URL};

/// Configuration for the Bedrock provider
#[derive(Debug, Clone)]
pub struct BedrockConfig {
    /// Bearer API key for authentication
    pub api_key: String,
    /// Base URL for the Bedrock runtime endpoint
    pub base_url: String,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var(BEDROCK_API_KEY_ENV).unwrap_or_default(),
            base_url: BEDROCK_DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl BedrockConfig {
    /// Create a new configuration with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Set the base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

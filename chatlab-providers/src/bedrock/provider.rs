//! Bedrock provider implementation
//!
//! Speaks the converse / converse-stream REST surface of a Bedrock-runtime
//! style endpoint. The streaming call returns server-sent events whose data
//! payloads are the converse-stream chunk objects.

use async_trait::async_trait;
use chatlab_core::{ConverseOutput, ConverseRequest, Error, Transport};
use reqwest::header::HeaderMap;
use std::sync::Arc;
use tracing::debug;

use crate::bedrock::{
    config::BedrockConfig, converter::BedrockConverter, parser::BedrockParser,
    stream::BedrockStream,
};
use crate::http::{create_headers, HttpClient, ReqwestClient};
use crate::traits::{RequestConverter, ResponseParser};

/// Bedrock-runtime provider for converse calls
///
/// # Example
///
/// ```no_run
/// use chatlab_providers::Bedrock;
///
/// // Create with an API key
/// let provider = Bedrock::with_api_key("your-api-key");
///
/// // Or with custom configuration and client
/// use chatlab_providers::bedrock::BedrockConfig;
/// use chatlab_providers::http::ReqwestClient;
/// use std::sync::Arc;
///
/// let config = BedrockConfig::new("your-api-key")
///     .with_base_url("https://bedrock-runtime.eu-west-1.amazonaws.com");
/// let client = Arc::new(ReqwestClient::new().expect("Failed to create client"));
/// let provider = Bedrock::new(config, client);
/// ```
#[derive(Clone)]
pub struct Bedrock {
    config: BedrockConfig,
    client: Arc<dyn HttpClient>,
    converter: BedrockConverter,
    parser: BedrockParser,
}

impl Bedrock {
    /// Create a new Bedrock provider with the given configuration and client
    pub fn new(config: BedrockConfig, client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            client,
            converter: BedrockConverter,
            parser: BedrockParser,
        }
    }

    /// Create a new Bedrock provider with just an API key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        let config = BedrockConfig::new(api_key);
        let client = Arc::new(ReqwestClient::new().expect("Failed to create HTTP client"));
        Self::new(config, client)
    }

    fn headers(&self) -> Result<HeaderMap, Error> {
        create_headers(&self.config.api_key)
    }

    fn url(&self, model_id: &str, action: &str) -> String {
        format!("{}/model/{}/{}", self.config.base_url, model_id, action)
    }
}

#[async_trait]
impl Transport for Bedrock {
    type EventStream = BedrockStream;

    async fn converse(&self, request: ConverseRequest) -> Result<ConverseOutput, Error> {
        let url = self.url(&request.model.0, "converse");
        debug!(model = %request.model, messages = request.messages.len(), "converse request");

        let body = self.converter.convert_request(request).await?;
        let headers = self.headers()?;

        let response_value = self.client.post(&url, headers, body).await?;
        self.parser.parse_response(response_value).await
    }

    async fn converse_stream(&self, request: ConverseRequest) -> Result<Self::EventStream, Error> {
        let url = self.url(&request.model.0, "converse-stream");
        debug!(model = %request.model, messages = request.messages.len(), "converse-stream request");

        let body = self.converter.convert_request(request).await?;
        let headers = self.headers()?;

        let event_source = self.client.post_event_stream(&url, headers, body).await?;
        Ok(BedrockStream::new(event_source, self.parser))
    }
}

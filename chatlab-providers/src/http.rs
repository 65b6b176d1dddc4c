//! HTTP client abstraction and utilities

use crate::error;
use chatlab_core::Error;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest_eventsource::{EventSource, RequestBuilderExt};
use serde_json::Value;

/// HTTP client abstraction
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a POST request and return the JSON response body
    async fn post(&self, url: &str, headers: HeaderMap, body: Value) -> Result<Value, Error>;

    /// Send a POST request and return a server-sent event source
    async fn post_event_stream(
        &self,
        url: &str,
        headers: HeaderMap,
        body: Value,
    ) -> Result<EventSource, Error>;
}

/// Default HTTP client implementation using reqwest
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .map_err(error::network_error)?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl HttpClient for ReqwestClient {
    async fn post(&self, url: &str, headers: HeaderMap, body: Value) -> Result<Value, Error> {
        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(error::network_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::transport(format!("HTTP {}: {}", status, text)));
        }

        response.json().await.map_err(error::network_error)
    }

    async fn post_event_stream(
        &self,
        url: &str,
        headers: HeaderMap,
        body: Value,
    ) -> Result<EventSource, Error> {
        self.client
            .post(url)
            .headers(headers)
            .json(&body)
            .eventsource()
            .map_err(|e| Error::transport(format!("failed to open event stream: {}", e)))
    }
}

/// Helper to create common headers
pub fn create_headers(api_key: &str) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();

    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| Error::Configuration(format!("Invalid API key: {}", e)))?,
    );

    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(headers)
}

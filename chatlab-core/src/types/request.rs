//! Request types for conversation calls

use crate::types::message::Message;
use thiserror::Error;

/// A model identifier
///
/// Opaque to this library; an invalid value is rejected only by the remote
/// endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelId(pub String);

impl ModelId {
    /// Create a new model identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl Default for ModelId {
    fn default() -> Self {
        Self("anthropic.claude-3-haiku-20240307-v1:0".to_string())
    }
}

impl From<&str> for ModelId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ModelId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameters for controlling model inference
///
/// Values are forwarded as given; out-of-range values are the remote
/// endpoint's to reject.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InferenceConfig {
    /// Temperature for randomness (expected 0.0 to 1.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

/// Model-specific fields outside the common inference configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdditionalModelFields {
    /// Top-K sampling cutoff
    pub top_k: Option<u32>,
}

/// A request to a converse-style endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct ConverseRequest {
    /// The model to use
    pub model: ModelId,
    /// The conversation messages, oldest first
    pub messages: Vec<Message>,
    /// System instruction, passed out-of-band from the messages
    pub system: Option<String>,
    /// Generation parameters
    pub inference: InferenceConfig,
    /// Model-specific request fields
    pub additional_fields: AdditionalModelFields,
}

impl ConverseRequest {
    /// Create a new request builder
    pub fn builder() -> ConverseRequestBuilder {
        ConverseRequestBuilder::default()
    }
}

/// Builder for [`ConverseRequest`]
#[derive(Default)]
pub struct ConverseRequestBuilder {
    model: Option<ModelId>,
    messages: Vec<Message>,
    system: Option<String>,
    inference: InferenceConfig,
    additional_fields: AdditionalModelFields,
}

impl ConverseRequestBuilder {
    /// Set the model
    pub fn model(mut self, model: impl Into<ModelId>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Add a message
    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Add multiple messages
    pub fn messages(mut self, messages: impl IntoIterator<Item = Message>) -> Self {
        self.messages.extend(messages);
        self
    }

    /// Set the system instruction
    pub fn system(mut self, system: impl Into<String>) -> Self {
        let system = system.into();
        if !system.is_empty() {
            self.system = Some(system);
        }
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.inference.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens to generate
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.inference.max_tokens = Some(max_tokens);
        self
    }

    /// Set the top-k cutoff
    pub fn top_k(mut self, top_k: u32) -> Self {
        self.additional_fields.top_k = Some(top_k);
        self
    }

    /// Try to build the request, returning an error if validation fails
    pub fn try_build(self) -> Result<ConverseRequest, BuildError> {
        if self.messages.is_empty() {
            return Err(BuildError::NoMessages);
        }
        let model = self.model.ok_or(BuildError::NoModel)?;

        Ok(ConverseRequest {
            model,
            messages: self.messages,
            system: self.system,
            inference: self.inference,
            additional_fields: self.additional_fields,
        })
    }
}

/// Errors that can occur when building a request
#[derive(Debug, Error)]
pub enum BuildError {
    /// Request must contain at least one message
    #[error("Request must contain at least one message")]
    NoMessages,
    /// Request must name a model
    #[error("Request must name a model")]
    NoModel,
}

//! High-level client implementation

use crate::conversation::{report_usage, ConverseStream};
use chatlab_core::{
    Conversation, ConverseRequest, Error, InferenceConfig, Message, ModelId, Transport,
};
use chatlab_pricing::PricingTable;
use std::sync::Arc;
use tracing::debug;

/// High-level client for stateful streaming conversations
///
/// Owns the injected transport and the per-session defaults (model, system
/// prompt, inference parameters, optional pricing table). The conversation
/// history itself stays with the caller and is passed into each call by
/// mutable reference, which also rules out two concurrent calls appending to
/// the same history.
///
/// # Examples
///
/// ```no_run
/// use chatlab_client::Client;
/// use chatlab_core::Conversation;
/// use chatlab_providers::Bedrock;
/// use futures::StreamExt;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = Bedrock::with_api_key("your-api-key");
/// let client = Client::new(transport)
///     .with_system("You are a friendly assistant")
///     .with_temperature(0.5)
///     .with_top_k(150);
///
/// let mut conversation = Conversation::new();
/// let mut stream = client.converse(&mut conversation, "Hello!").await?;
/// while let Some(fragment) = stream.next().await {
///     print!("{}", fragment?);
/// }
/// drop(stream);
/// assert_eq!(conversation.len(), 2);
/// # Ok(())
/// # }
/// ```
pub struct Client<T: Transport> {
    transport: T,
    model: ModelId,
    system: Option<String>,
    inference: InferenceConfig,
    top_k: Option<u32>,
    pricing: Option<Arc<PricingTable>>,
}

impl<T: Transport> Client<T> {
    /// Create a new client with a transport
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            model: ModelId::default(),
            system: None,
            inference: InferenceConfig::default(),
            top_k: None,
            pricing: None,
        }
    }

    /// Set the model for requests
    pub fn with_model(mut self, model: impl Into<ModelId>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the system prompt; an empty prompt is treated as absent
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        let system = system.into();
        self.system = (!system.is_empty()).then_some(system);
        self
    }

    /// Set the sampling temperature, forwarded as-is
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.inference.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens to generate
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.inference.max_tokens = Some(max_tokens);
        self
    }

    /// Set the top-k cutoff, forwarded as-is
    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Attach a pricing table for cost estimation
    pub fn with_pricing(mut self, pricing: Arc<PricingTable>) -> Self {
        self.pricing = Some(pricing);
        self
    }

    /// Get a reference to the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn build_request(&self, conversation: &Conversation) -> Result<ConverseRequest, Error> {
        let mut builder = ConverseRequest::builder()
            .model(self.model.clone())
            .messages(conversation.iter().cloned());
        if let Some(system) = &self.system {
            builder = builder.system(system.clone());
        }
        if let Some(temperature) = self.inference.temperature {
            builder = builder.temperature(temperature);
        }
        if let Some(max_tokens) = self.inference.max_tokens {
            builder = builder.max_tokens(max_tokens);
        }
        if let Some(top_k) = self.top_k {
            builder = builder.top_k(top_k);
        }
        builder
            .try_build()
            .map_err(|e| Error::Validation(e.to_string()))
    }

    fn validate_question(question: &str) -> Result<(), Error> {
        if question.trim().is_empty() {
            return Err(Error::Validation("question must not be empty".into()));
        }
        Ok(())
    }

    /// Ask a question and stream the answer back fragment by fragment
    ///
    /// The question is appended to `conversation` before the request goes
    /// out, so the remote call always sees the full history including the
    /// just-asked question. The returned stream appends the assistant turn
    /// when it completes; see [`ConverseStream`] for the exact finalization
    /// and failure semantics.
    pub async fn converse<'c>(
        &self,
        conversation: &'c mut Conversation,
        question: &str,
    ) -> Result<ConverseStream<'c, T::EventStream>, Error> {
        Self::validate_question(question)?;

        conversation.add_message(Message::user(question));
        let request = self.build_request(conversation)?;

        debug!(model = %self.model, turns = conversation.len(), "starting streamed turn");
        let events = self.transport.converse_stream(request).await?;

        Ok(ConverseStream::new(
            events,
            conversation,
            self.model.clone(),
            self.pricing.clone(),
        ))
    }

    /// Ask a question and wait for the complete answer
    ///
    /// Same history contract as [`converse`](Self::converse), without
    /// streaming: both the user turn and the assistant turn are appended
    /// before this returns.
    pub async fn ask(
        &self,
        conversation: &mut Conversation,
        question: &str,
    ) -> Result<String, Error> {
        Self::validate_question(question)?;

        conversation.add_message(Message::user(question));
        let request = self.build_request(conversation)?;

        debug!(model = %self.model, turns = conversation.len(), "starting turn");
        let output = self.transport.converse(request).await?;

        let text = output.message.text_content();
        conversation.add_message(output.message);

        if let Some(usage) = &output.usage {
            report_usage(&self.model, self.pricing.as_deref(), usage);
        }

        Ok(text)
    }
}

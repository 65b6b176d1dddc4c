//! Conversion between ChatLab types and the Bedrock converse wire format

use crate::traits::RequestConverter;
use async_trait::async_trait;
use chatlab_core::{ContentBlock, ConverseRequest, Error, Message, Role};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// Wire request types

#[derive(Debug, Serialize)]
pub struct BedrockRequest {
    pub messages: Vec<BedrockMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<Vec<BedrockSystemBlock>>,
    #[serde(rename = "inferenceConfig", skip_serializing_if = "Option::is_none")]
    pub inference_config: Option<BedrockInferenceConfig>,
    #[serde(
        rename = "additionalModelRequestFields",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_model_request_fields: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BedrockMessage {
    pub role: String,
    pub content: Vec<BedrockContentBlock>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BedrockContentBlock {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct BedrockSystemBlock {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct BedrockInferenceConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(rename = "maxTokens", skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

// Conversion functions

pub fn to_bedrock_request(request: &ConverseRequest) -> BedrockRequest {
    let messages = request.messages.iter().map(convert_message).collect();

    let system = request
        .system
        .as_ref()
        .map(|text| vec![BedrockSystemBlock { text: text.clone() }]);

    let inference_config = if request.inference.temperature.is_some()
        || request.inference.max_tokens.is_some()
    {
        Some(BedrockInferenceConfig {
            temperature: request.inference.temperature,
            max_tokens: request.inference.max_tokens,
        })
    } else {
        None
    };

    let additional_model_request_fields = request
        .additional_fields
        .top_k
        .map(|top_k| json!({ "top_k": top_k }));

    BedrockRequest {
        messages,
        system,
        inference_config,
        additional_model_request_fields,
    }
}

fn convert_message(message: &Message) -> BedrockMessage {
    let role = match message.role {
        Role::User => "user",
        Role::Assistant => "assistant",
    };

    let content = message
        .content
        .iter()
        .map(|block| match block {
            ContentBlock::Text(text) => BedrockContentBlock { text: text.clone() },
        })
        .collect();

    BedrockMessage {
        role: role.to_string(),
        content,
    }
}

/// Converter implementation for Bedrock
#[derive(Clone, Copy)]
pub struct BedrockConverter;

#[async_trait]
impl RequestConverter for BedrockConverter {
    async fn convert_request(&self, request: ConverseRequest) -> Result<Value, Error> {
        let body = to_bedrock_request(&request);
        serde_json::to_value(body).map_err(crate::error::serialization_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatlab_core::ConverseRequest;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_wire_shape() {
        let request = ConverseRequest::builder()
            .model("anthropic.claude-3-haiku-20240307-v1:0")
            .message(Message::user("Hi"))
            .message(Message::assistant("Hello!"))
            .message(Message::user("How are you?"))
            .system("Be brief")
            .temperature(0.5)
            .top_k(150)
            .try_build()
            .unwrap();

        let value = serde_json::to_value(to_bedrock_request(&request)).unwrap();
        assert_eq!(
            value,
            json!({
                "messages": [
                    {"role": "user", "content": [{"text": "Hi"}]},
                    {"role": "assistant", "content": [{"text": "Hello!"}]},
                    {"role": "user", "content": [{"text": "How are you?"}]},
                ],
                "system": [{"text": "Be brief"}],
                "inferenceConfig": {"temperature": 0.5},
                "additionalModelRequestFields": {"top_k": 150},
            })
        );
    }

    #[test]
    fn test_optional_sections_omitted() {
        let request = ConverseRequest::builder()
            .model("m")
            .message(Message::user("Hi"))
            .try_build()
            .unwrap();

        let value = serde_json::to_value(to_bedrock_request(&request)).unwrap();
        assert_eq!(
            value,
            json!({
                "messages": [{"role": "user", "content": [{"text": "Hi"}]}],
            })
        );
    }
}

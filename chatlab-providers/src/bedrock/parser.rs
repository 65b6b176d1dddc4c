//! Bedrock wire-format parsing

use crate::traits::{ResponseParser, StreamEventParser};
use async_trait::async_trait;
use chatlab_core::{
    ContentDelta, ConverseOutput, Error, Message, Role, StopReason, StreamEvent, StreamMetadata,
    StreamMetrics, TokenUsage, UsageRecord,
};
use serde::Deserialize;
use serde_json::Value;

// Streamed chunk types. External tagging gives exactly the wire shape:
// each chunk is an object with a single kind key, e.g.
// `{"contentBlockDelta": {"delta": {"text": "Hel"}, "contentBlockIndex": 0}}`.
#[derive(Debug, Deserialize)]
pub enum BedrockStreamChunk {
    #[serde(rename = "messageStart")]
    MessageStart {
        role: String,
    },
    #[serde(rename = "contentBlockStart")]
    ContentBlockStart {
        #[serde(rename = "contentBlockIndex")]
        content_block_index: Option<usize>,
    },
    #[serde(rename = "contentBlockDelta")]
    ContentBlockDelta {
        delta: BedrockDelta,
        #[serde(rename = "contentBlockIndex")]
        content_block_index: Option<usize>,
    },
    #[serde(rename = "contentBlockStop")]
    ContentBlockStop {
        #[serde(rename = "contentBlockIndex")]
        content_block_index: Option<usize>,
    },
    #[serde(rename = "messageStop")]
    MessageStop {
        #[serde(rename = "stopReason")]
        stop_reason: String,
    },
    #[serde(rename = "metadata")]
    Metadata(BedrockMetadata),
}

#[derive(Debug, Deserialize)]
pub struct BedrockDelta {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BedrockMetadata {
    pub usage: Option<BedrockUsage>,
    pub metrics: Option<BedrockMetrics>,
}

#[derive(Debug, Deserialize)]
pub struct BedrockUsage {
    #[serde(rename = "inputTokens")]
    pub input_tokens: u32,
    #[serde(rename = "outputTokens")]
    pub output_tokens: u32,
    #[serde(rename = "totalTokens")]
    pub total_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct BedrockMetrics {
    #[serde(rename = "latencyMs")]
    pub latency_ms: u64,
}

// Non-streaming response types

#[derive(Debug, Deserialize)]
pub struct BedrockConverseResponse {
    pub output: BedrockOutput,
    #[serde(rename = "stopReason")]
    pub stop_reason: Option<String>,
    pub usage: Option<BedrockUsage>,
    pub metrics: Option<BedrockMetrics>,
}

#[derive(Debug, Deserialize)]
pub struct BedrockOutput {
    pub message: crate::bedrock::converter::BedrockMessage,
}

fn parse_role(role: &str) -> Role {
    match role {
        "user" => Role::User,
        _ => Role::Assistant,
    }
}

fn parse_usage(usage: &BedrockUsage) -> TokenUsage {
    TokenUsage {
        input_tokens: usage.input_tokens,
        output_tokens: usage.output_tokens,
        total_tokens: usage
            .total_tokens
            .unwrap_or(usage.input_tokens + usage.output_tokens),
    }
}

/// Parse one streamed chunk into a core event
///
/// `Ok(None)` means the chunk carries nothing the consumer needs
/// (content block boundaries, non-text deltas).
pub fn parse_chunk(data: &str) -> Result<Option<StreamEvent>, Error> {
    let chunk: BedrockStreamChunk =
        serde_json::from_str(data).map_err(crate::error::serialization_error)?;

    match chunk {
        BedrockStreamChunk::MessageStart { role } => Ok(Some(StreamEvent::MessageStart {
            role: parse_role(&role),
        })),
        BedrockStreamChunk::ContentBlockStart { .. }
        | BedrockStreamChunk::ContentBlockStop { .. } => Ok(None),
        BedrockStreamChunk::ContentBlockDelta { delta, .. } => {
            Ok(delta
                .text
                .map(|text| StreamEvent::ContentBlockDelta(ContentDelta { text })))
        }
        BedrockStreamChunk::MessageStop { stop_reason } => Ok(Some(StreamEvent::MessageStop {
            stop_reason: StopReason::from_wire(&stop_reason),
        })),
        BedrockStreamChunk::Metadata(metadata) => {
            Ok(Some(StreamEvent::Metadata(StreamMetadata {
                usage: metadata.usage.as_ref().map(parse_usage),
                metrics: metadata.metrics.map(|m| StreamMetrics {
                    latency_ms: m.latency_ms,
                }),
            })))
        }
    }
}

pub fn parse_converse_response(response: BedrockConverseResponse) -> Result<ConverseOutput, Error> {
    let text: String = response
        .output
        .message
        .content
        .iter()
        .map(|block| block.text.as_str())
        .collect();

    let message = Message::text(parse_role(&response.output.message.role), text);

    let usage = response.usage.as_ref().map(|usage| {
        let mut record = UsageRecord::from(parse_usage(usage));
        record.latency_ms = response.metrics.as_ref().map(|m| m.latency_ms);
        record
    });

    Ok(ConverseOutput {
        message,
        stop_reason: response
            .stop_reason
            .as_deref()
            .map(StopReason::from_wire),
        usage,
    })
}

/// Parser implementation for Bedrock
#[derive(Clone, Copy)]
pub struct BedrockParser;

#[async_trait]
impl ResponseParser for BedrockParser {
    async fn parse_response(&self, value: Value) -> Result<ConverseOutput, Error> {
        let response: BedrockConverseResponse =
            serde_json::from_value(value).map_err(crate::error::serialization_error)?;
        parse_converse_response(response)
    }
}

impl StreamEventParser for BedrockParser {
    fn parse_event(&self, data: &str) -> Result<Option<StreamEvent>, Error> {
        parse_chunk(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_message_start() {
        let event = parse_chunk(r#"{"messageStart": {"role": "assistant"}}"#).unwrap();
        assert_eq!(
            event,
            Some(StreamEvent::MessageStart {
                role: Role::Assistant
            })
        );
    }

    #[test]
    fn test_parse_content_block_delta() {
        let event =
            parse_chunk(r#"{"contentBlockDelta": {"delta": {"text": "Hel"}, "contentBlockIndex": 0}}"#)
                .unwrap();
        assert_eq!(
            event,
            Some(StreamEvent::ContentBlockDelta(ContentDelta {
                text: "Hel".into()
            }))
        );
    }

    #[test]
    fn test_non_text_delta_is_skipped() {
        let event = parse_chunk(r#"{"contentBlockDelta": {"delta": {}}}"#).unwrap();
        assert_eq!(event, None);

        let event = parse_chunk(r#"{"contentBlockStop": {"contentBlockIndex": 0}}"#).unwrap();
        assert_eq!(event, None);
    }

    #[test]
    fn test_parse_message_stop() {
        let event = parse_chunk(r#"{"messageStop": {"stopReason": "end_turn"}}"#).unwrap();
        assert_eq!(
            event,
            Some(StreamEvent::MessageStop {
                stop_reason: StopReason::EndTurn
            })
        );
    }

    #[test]
    fn test_parse_metadata() {
        let event = parse_chunk(
            r#"{"metadata": {"usage": {"inputTokens": 5, "outputTokens": 2, "totalTokens": 7},
                "metrics": {"latencyMs": 430}}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            Some(StreamEvent::Metadata(StreamMetadata {
                usage: Some(TokenUsage {
                    input_tokens: 5,
                    output_tokens: 2,
                    total_tokens: 7,
                }),
                metrics: Some(StreamMetrics { latency_ms: 430 }),
            }))
        );
    }

    #[test]
    fn test_parse_metadata_without_usage() {
        let event = parse_chunk(r#"{"metadata": {"metrics": {"latencyMs": 10}}}"#).unwrap();
        assert_eq!(
            event,
            Some(StreamEvent::Metadata(StreamMetadata {
                usage: None,
                metrics: Some(StreamMetrics { latency_ms: 10 }),
            }))
        );
    }

    #[test]
    fn test_malformed_chunk_is_error() {
        let err = parse_chunk("not json").unwrap_err();
        assert!(matches!(err, Error::Serialization { .. }));

        let err = parse_chunk(r#"{"somethingElse": {}}"#).unwrap_err();
        assert!(matches!(err, Error::Serialization { .. }));
    }

    #[test]
    fn test_stream_event_parser_dispatch() {
        // The event stream parses through the trait object seam, so the
        // trait impl must agree with the free function for every chunk kind.
        fn parse_via_trait(parser: &dyn StreamEventParser, data: &str) -> Option<StreamEvent> {
            parser.parse_event(data).unwrap()
        }

        let parser = BedrockParser;
        let data = r#"{"contentBlockDelta": {"delta": {"text": "Hel"}}}"#;
        assert_eq!(parse_via_trait(&parser, data), parse_chunk(data).unwrap());

        let data = r#"{"messageStop": {"stopReason": "end_turn"}}"#;
        assert_eq!(
            parse_via_trait(&parser, data),
            Some(StreamEvent::MessageStop {
                stop_reason: StopReason::EndTurn
            })
        );

        assert!(parser.parse_event("not json").is_err());
    }

    #[test]
    fn test_parse_converse_response() {
        let response: BedrockConverseResponse = serde_json::from_str(
            r#"{
                "output": {"message": {"role": "assistant", "content": [{"text": "Hello!"}]}},
                "stopReason": "end_turn",
                "usage": {"inputTokens": 5, "outputTokens": 2, "totalTokens": 7},
                "metrics": {"latencyMs": 430}
            }"#,
        )
        .unwrap();

        let output = parse_converse_response(response).unwrap();
        assert_eq!(output.message, Message::assistant("Hello!"));
        assert_eq!(output.stop_reason, Some(StopReason::EndTurn));
        let usage = output.usage.unwrap();
        assert_eq!(usage.total_tokens, 7);
        assert_eq!(usage.latency_ms, Some(430));
    }
}

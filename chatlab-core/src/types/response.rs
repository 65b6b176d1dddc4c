//! Response types for conversation calls

use crate::types::message::Message;
use crate::types::stream::{StopReason, StreamMetadata, TokenUsage};
use std::fmt;

/// Usage accounting for one completed call
///
/// Derived once per call from the trailing metadata event, if present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageRecord {
    /// Tokens in the request
    pub input_tokens: u32,
    /// Tokens generated
    pub output_tokens: u32,
    /// Total tokens for the call
    pub total_tokens: u32,
    /// End-to-end latency in milliseconds, if reported
    pub latency_ms: Option<u64>,
}

impl UsageRecord {
    /// Build a usage record from stream metadata, if it carries usage
    pub fn from_metadata(metadata: &StreamMetadata) -> Option<Self> {
        metadata.usage.map(|usage| Self {
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            total_tokens: usage.total_tokens,
            latency_ms: metadata.metrics.map(|m| m.latency_ms),
        })
    }
}

impl From<TokenUsage> for UsageRecord {
    fn from(usage: TokenUsage) -> Self {
        Self {
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            total_tokens: usage.total_tokens,
            latency_ms: None,
        }
    }
}

impl fmt::Display for UsageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Usage(input: {}, output: {}, total: {})",
            self.input_tokens, self.output_tokens, self.total_tokens
        )
    }
}

/// A complete response from a non-streaming converse call
#[derive(Debug, Clone, PartialEq)]
pub struct ConverseOutput {
    /// The generated assistant message
    pub message: Message,
    /// Why generation stopped, if reported
    pub stop_reason: Option<StopReason>,
    /// Usage accounting, if reported
    pub usage: Option<UsageRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::stream::StreamMetrics;

    #[test]
    fn test_usage_from_metadata() {
        let metadata = StreamMetadata {
            usage: Some(TokenUsage {
                input_tokens: 5,
                output_tokens: 2,
                total_tokens: 7,
            }),
            metrics: Some(StreamMetrics { latency_ms: 430 }),
        };
        let record = UsageRecord::from_metadata(&metadata).unwrap();
        assert_eq!(record.input_tokens, 5);
        assert_eq!(record.output_tokens, 2);
        assert_eq!(record.total_tokens, 7);
        assert_eq!(record.latency_ms, Some(430));
    }

    #[test]
    fn test_metadata_without_usage_is_none() {
        let metadata = StreamMetadata {
            usage: None,
            metrics: Some(StreamMetrics { latency_ms: 10 }),
        };
        assert!(UsageRecord::from_metadata(&metadata).is_none());
    }

    #[test]
    fn test_usage_display() {
        let record = UsageRecord {
            input_tokens: 5,
            output_tokens: 2,
            total_tokens: 7,
            latency_ms: None,
        };
        assert_eq!(record.to_string(), "Usage(input: 5, output: 2, total: 7)");
    }
}

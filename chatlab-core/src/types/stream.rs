//! Streaming event types for incremental responses

use crate::types::message::Role;

/// A chunk of assistant text in a stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDelta {
    /// The text fragment
    pub text: String,
}

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Natural end of the turn
    EndTurn,
    /// Hit the max_tokens limit
    MaxTokens,
    /// Hit a stop sequence
    StopSequence,
    /// Content was filtered
    ContentFiltered,
    /// A reason this library does not know about
    Other(String),
}

impl StopReason {
    /// Parse a wire-format stop reason, preserving unknown values
    pub fn from_wire(value: &str) -> Self {
        match value {
            "end_turn" => StopReason::EndTurn,
            "max_tokens" => StopReason::MaxTokens,
            "stop_sequence" => StopReason::StopSequence,
            "content_filtered" => StopReason::ContentFiltered,
            other => StopReason::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::EndTurn => write!(f, "end_turn"),
            StopReason::MaxTokens => write!(f, "max_tokens"),
            StopReason::StopSequence => write!(f, "stop_sequence"),
            StopReason::ContentFiltered => write!(f, "content_filtered"),
            StopReason::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Token counts reported by the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenUsage {
    /// Tokens in the request
    pub input_tokens: u32,
    /// Tokens generated
    pub output_tokens: u32,
    /// Total tokens for the call
    pub total_tokens: u32,
}

/// Call metrics reported by the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamMetrics {
    /// End-to-end latency in milliseconds
    pub latency_ms: u64,
}

/// Trailing metadata for a streamed call
///
/// Both sub-records are optional; their absence is not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamMetadata {
    /// Token usage, if reported
    pub usage: Option<TokenUsage>,
    /// Call metrics, if reported
    pub metrics: Option<StreamMetrics>,
}

/// Events emitted by a converse stream, in fixed causal order:
/// at most one `MessageStart`, zero or more `ContentBlockDelta`,
/// an optional `MessageStop`, an optional trailing `Metadata`.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// The assistant turn has started
    MessageStart {
        /// Role of the message being generated
        role: Role,
    },
    /// A text fragment was generated
    ContentBlockDelta(ContentDelta),
    /// The assistant turn is complete
    MessageStop {
        /// Why generation stopped
        stop_reason: StopReason,
    },
    /// Trailing usage and metrics
    Metadata(StreamMetadata),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_reason_from_wire() {
        assert_eq!(StopReason::from_wire("end_turn"), StopReason::EndTurn);
        assert_eq!(StopReason::from_wire("max_tokens"), StopReason::MaxTokens);
        assert_eq!(
            StopReason::from_wire("tool_use"),
            StopReason::Other("tool_use".into())
        );
    }

    #[test]
    fn test_stop_reason_display_round_trip() {
        for reason in [
            StopReason::EndTurn,
            StopReason::MaxTokens,
            StopReason::StopSequence,
            StopReason::ContentFiltered,
        ] {
            assert_eq!(StopReason::from_wire(&reason.to_string()), reason);
        }
    }
}

//! Core transport trait for converse-style endpoints

use crate::error::Result;
use crate::types::request::ConverseRequest;
use crate::types::response::ConverseOutput;
use crate::types::stream::StreamEvent;
use async_trait::async_trait;

/// The fundamental trait for talking to a remote converse endpoint
///
/// Implementations own the wire encoding; consumers only see an ordered
/// sequence of [`StreamEvent`]s ending with stream exhaustion or an error.
/// Constructed once and passed in explicitly, so tests can substitute a
/// scripted double.
#[async_trait]
pub trait Transport: Send + Sync {
    /// The event stream type returned by this transport
    type EventStream: futures_core::Stream<Item = Result<StreamEvent>> + Send + Unpin;

    /// Send a request and get the complete response at once
    async fn converse(&self, request: ConverseRequest) -> Result<ConverseOutput>;

    /// Send a request and get an ordered stream of events
    async fn converse_stream(&self, request: ConverseRequest) -> Result<Self::EventStream>;
}

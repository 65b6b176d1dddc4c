//! Incremental reconstruction of a streamed conversation turn

use chatlab_core::{
    Conversation, Error, Message, ModelId, StreamEvent, StreamMetadata, UsageRecord,
};
use chatlab_pricing::{CostEstimate, PricingTable};
use futures_core::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tracing::{debug, info, trace, warn};

/// Per-call lifecycle. `Stopped` and `Done` are reached at most once;
/// `Failed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Streaming,
    Stopped,
    Failed,
    Done,
}

/// A pull-based stream of assistant text fragments for one conversation turn
///
/// Produced by [`Client::converse`](crate::Client::converse). Each
/// `contentBlockDelta` from the endpoint yields one fragment; everything else
/// is consumed internally. When the turn completes (or the transport closes
/// early) the accumulated text is appended to the caller's [`Conversation`]
/// as a single assistant message, exactly once. If the consumer drops the
/// stream before exhaustion the same finalization runs from `Drop`, so the
/// history never desynchronizes from what was streamed.
///
/// On a transport failure the error carries the partial accumulator text and
/// no assistant message is appended; whether to keep the partial turn is the
/// caller's decision.
///
/// Usage and cost are reported through `tracing` when the trailing metadata
/// event arrives, and remain readable through [`usage`](Self::usage) and
/// [`cost`](Self::cost) afterwards. They never interleave with the fragments.
pub struct ConverseStream<'a, S> {
    events: S,
    conversation: &'a mut Conversation,
    model: ModelId,
    pricing: Option<Arc<PricingTable>>,
    accumulator: String,
    phase: Phase,
    usage: Option<UsageRecord>,
    cost: Option<CostEstimate>,
}

impl<'a, S> ConverseStream<'a, S> {
    pub(crate) fn new(
        events: S,
        conversation: &'a mut Conversation,
        model: ModelId,
        pricing: Option<Arc<PricingTable>>,
    ) -> Self {
        Self {
            events,
            conversation,
            model,
            pricing,
            accumulator: String::new(),
            phase: Phase::Streaming,
            usage: None,
            cost: None,
        }
    }

    /// The assistant text accumulated so far
    pub fn text(&self) -> &str {
        &self.accumulator
    }

    /// Usage accounting for the call, once the metadata event has arrived
    pub fn usage(&self) -> Option<&UsageRecord> {
        self.usage.as_ref()
    }

    /// Estimated cost of the call, when usage and a pricing entry exist
    pub fn cost(&self) -> Option<CostEstimate> {
        self.cost
    }

    /// Append the accumulated text to the conversation as one assistant
    /// message. Runs at most once per call.
    fn finalize(&mut self) {
        if self.phase != Phase::Streaming {
            return;
        }
        debug!(chars = self.accumulator.len(), "finalizing assistant turn");
        self.conversation
            .add_message(Message::assistant(self.accumulator.clone()));
        self.phase = Phase::Stopped;
    }

    fn record_metadata(&mut self, metadata: &StreamMetadata) {
        let Some(usage) = UsageRecord::from_metadata(metadata) else {
            // Usage reporting is best-effort; nothing to account
            debug!("metadata event without usage");
            return;
        };

        let cost = report_usage(&self.model, self.pricing.as_deref(), &usage);

        self.usage = Some(usage);
        self.cost = cost;
    }
}

impl<S> Stream for ConverseStream<'_, S>
where
    S: Stream<Item = Result<StreamEvent, Error>> + Unpin,
{
    type Item = Result<String, Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if matches!(this.phase, Phase::Done | Phase::Failed) {
                return Poll::Ready(None);
            }

            match Pin::new(&mut this.events).poll_next(cx) {
                Poll::Ready(Some(Ok(event))) => match event {
                    StreamEvent::MessageStart { role } => {
                        trace!(%role, "message start");
                    }
                    StreamEvent::ContentBlockDelta(delta) => {
                        this.accumulator.push_str(&delta.text);
                        return Poll::Ready(Some(Ok(delta.text)));
                    }
                    StreamEvent::MessageStop { stop_reason } => {
                        debug!(%stop_reason, "message stop");
                        this.finalize();
                    }
                    StreamEvent::Metadata(metadata) => {
                        this.record_metadata(&metadata);
                    }
                },
                Poll::Ready(Some(Err(e))) => {
                    this.phase = Phase::Failed;
                    return Poll::Ready(Some(Err(e.with_partial(&this.accumulator))));
                }
                Poll::Ready(None) => {
                    // Transport closed without a message stop: keep the
                    // partial text rather than silently dropping it.
                    this.finalize();
                    this.phase = Phase::Done;
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl<S> Drop for ConverseStream<'_, S> {
    fn drop(&mut self) {
        // Consumer abandoned the stream mid-turn
        self.finalize();
    }
}

pub(crate) fn report_usage(
    model: &ModelId,
    pricing: Option<&PricingTable>,
    usage: &UsageRecord,
) -> Option<CostEstimate> {
    let cost = pricing.and_then(|table| table.estimate(&model.0, usage));
    match cost {
        Some(estimate) => info!(
            model = %model,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            total_tokens = usage.total_tokens,
            latency_ms = ?usage.latency_ms,
            cost_usd = estimate.total(),
            "call usage"
        ),
        None => warn!(
            model = %model,
            total_tokens = usage.total_tokens,
            "no pricing entry for model, cost unavailable"
        ),
    }
    cost
}

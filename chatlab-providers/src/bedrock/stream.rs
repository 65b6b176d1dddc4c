//! Bedrock streaming implementation

use crate::bedrock::parser::BedrockParser;
use crate::traits::StreamEventParser;
use chatlab_core::{Error, StreamEvent};
use futures_core::Stream;
use reqwest_eventsource::{Event, EventSource};
use std::pin::Pin;
use std::task::{Context, Poll};

/// Ordered event stream over an open converse-stream call
///
/// Wraps the server-sent event source and surfaces parsed core events.
/// Dropping the stream closes the underlying connection.
pub struct BedrockStream {
    inner: EventSource,
    parser: BedrockParser,
}

impl BedrockStream {
    pub(crate) fn new(event_source: EventSource, parser: BedrockParser) -> Self {
        Self {
            inner: event_source,
            parser,
        }
    }
}

impl Stream for BedrockStream {
    type Item = Result<StreamEvent, Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(Event::Open))) => continue,
                Poll::Ready(Some(Ok(Event::Message(msg)))) => {
                    match self.parser.parse_event(&msg.data) {
                        Ok(Some(event)) => return Poll::Ready(Some(Ok(event))),
                        Ok(None) => continue,
                        Err(e) => {
                            self.inner.close();
                            return Poll::Ready(Some(Err(e)));
                        }
                    }
                }
                // The server closing the connection is stream exhaustion,
                // not a failure; without this the source would reconnect.
                Poll::Ready(Some(Err(reqwest_eventsource::Error::StreamEnded))) => {
                    self.inner.close();
                    return Poll::Ready(None);
                }
                Poll::Ready(Some(Err(e))) => {
                    self.inner.close();
                    return Poll::Ready(Some(Err(Error::transport(e.to_string()))));
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

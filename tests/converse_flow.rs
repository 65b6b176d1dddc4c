//! End-to-end conversation flow tests against a scripted transport

use async_trait::async_trait;
use chatlab::client::Client;
use chatlab::pricing::{ModelPricing, PricingTable};
use chatlab::{
    ContentDelta, Conversation, ConverseOutput, ConverseRequest, Error, Message, Role, StopReason,
    StreamEvent, StreamMetadata, StreamMetrics, TokenUsage, Transport,
};
use futures::StreamExt;
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

/// Replays a scripted event sequence and records the requests it saw
struct ScriptedTransport {
    events: Mutex<Vec<Result<StreamEvent, Error>>>,
    requests: Mutex<Vec<ConverseRequest>>,
}

impl ScriptedTransport {
    fn new(events: Vec<Result<StreamEvent, Error>>) -> Self {
        Self {
            events: Mutex::new(events),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn last_request(&self) -> ConverseRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    type EventStream = futures::stream::Iter<std::vec::IntoIter<Result<StreamEvent, Error>>>;

    async fn converse(&self, _request: ConverseRequest) -> Result<ConverseOutput, Error> {
        unimplemented!("streaming only")
    }

    async fn converse_stream(
        &self,
        request: ConverseRequest,
    ) -> Result<Self::EventStream, Error> {
        self.requests.lock().unwrap().push(request);
        let events = std::mem::take(&mut *self.events.lock().unwrap());
        Ok(futures::stream::iter(events))
    }
}

fn scripted_turn(text_fragments: &[&str]) -> Vec<Result<StreamEvent, Error>> {
    let mut events = vec![Ok(StreamEvent::MessageStart {
        role: Role::Assistant,
    })];
    for fragment in text_fragments {
        events.push(Ok(StreamEvent::ContentBlockDelta(ContentDelta {
            text: (*fragment).to_string(),
        })));
    }
    events.push(Ok(StreamEvent::MessageStop {
        stop_reason: StopReason::EndTurn,
    }));
    events.push(Ok(StreamEvent::Metadata(StreamMetadata {
        usage: Some(TokenUsage {
            input_tokens: 5,
            output_tokens: 2,
            total_tokens: 7,
        }),
        metrics: Some(StreamMetrics { latency_ms: 430 }),
    })));
    events
}

#[test_log::test(tokio::test)]
async fn streamed_turn_reconstructs_history_and_cost() {
    let transport = ScriptedTransport::new(scripted_turn(&["Hel", "lo!"]));
    let pricing = Arc::new(PricingTable::from_entries([(
        "anthropic.claude-3-haiku",
        ModelPricing {
            input: 0.001,
            output: 0.003,
        },
    )]));
    let client = Client::new(transport)
        .with_model("anthropic.claude-3-haiku-20240307-v1:0")
        .with_system("You are a friendly assistant")
        .with_temperature(0.5)
        .with_top_k(150)
        .with_pricing(pricing);

    let mut conversation = Conversation::new();
    let mut stream = client.converse(&mut conversation, "Hi").await.unwrap();

    let mut fragments = Vec::new();
    while let Some(fragment) = stream.next().await {
        fragments.push(fragment.unwrap());
    }
    assert_eq!(fragments, vec!["Hel".to_string(), "lo!".to_string()]);
    assert_eq!(stream.text(), "Hello!");

    let usage = stream.usage().copied().unwrap();
    assert_eq!(usage.total_tokens, 7);
    let cost = stream.cost().unwrap();
    assert!((cost.total() - (5.0 * 0.001 + 2.0 * 0.003)).abs() < 1e-12);
    drop(stream);

    assert_eq!(
        conversation.messages(),
        &[Message::user("Hi"), Message::assistant("Hello!")]
    );

    // The upstream request carried the just-asked question and the knobs
    let request = client.transport().last_request();
    assert_eq!(request.messages.len(), 1);
    assert_eq!(request.messages[0], Message::user("Hi"));
    assert_eq!(request.system.as_deref(), Some("You are a friendly assistant"));
    assert_eq!(request.inference.temperature, Some(0.5));
    assert_eq!(request.additional_fields.top_k, Some(150));
}

#[test_log::test(tokio::test)]
async fn second_turn_carries_full_history_upstream() {
    let transport = ScriptedTransport::new(scripted_turn(&["Fine."]));
    let client = Client::new(transport);

    let mut conversation =
        Conversation::from(vec![Message::user("Hi"), Message::assistant("Hello!")]);
    {
        let mut stream = client
            .converse(&mut conversation, "How are you?")
            .await
            .unwrap();
        while stream.next().await.is_some() {}
    }

    assert_eq!(conversation.len(), 4);
    let request = client.transport().last_request();
    let texts: Vec<_> = request
        .messages
        .iter()
        .map(Message::text_content)
        .collect();
    assert_eq!(texts, vec!["Hi", "Hello!", "How are you?"]);
}

#[test_log::test(tokio::test)]
async fn transport_failure_surfaces_partial_text() {
    let transport = ScriptedTransport::new(vec![
        Ok(StreamEvent::ContentBlockDelta(ContentDelta {
            text: "Hel".into(),
        })),
        Err(Error::transport("connection reset")),
    ]);
    let client = Client::new(transport);

    let mut conversation = Conversation::new();
    let mut stream = client.converse(&mut conversation, "Hi").await.unwrap();

    assert_eq!(stream.next().await.unwrap().unwrap(), "Hel");
    let err = stream.next().await.unwrap().unwrap_err();
    assert_eq!(err.partial_text(), Some("Hel"));
    drop(stream);

    // The failed turn is not finalized; the caller decides what to keep
    assert_eq!(conversation.messages(), &[Message::user("Hi")]);
}

//! Stream Client Integration Tests
//!
//! Wires the client facade to an in-process transport and verifies that
//! events pushed by the transport reach listeners through the dispatcher.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::json;

use iex_stream::{
    ControlAction, ControlMessage, DEFAULT_CHANNEL_CAPACITY, FeedMessage, SharedTransport,
    StreamClient, Transport, TransportEvent, TransportEventSender,
};

/// Transport that records directives and exposes the inward event sender.
#[derive(Default)]
struct LoopbackTransport {
    sent: Mutex<Vec<ControlMessage>>,
}

impl LoopbackTransport {
    fn count(&self, action: ControlAction, symbol: &str) -> usize {
        self.sent
            .lock()
            .iter()
            .filter(|msg| msg.action == action && msg.symbol == symbol)
            .count()
    }
}

impl Transport for LoopbackTransport {
    fn send(&self, msg: ControlMessage) {
        self.sent.lock().push(msg);
    }
}

fn setup() -> (StreamClient, Arc<LoopbackTransport>, TransportEventSender) {
    let transport = Arc::new(LoopbackTransport::default());
    let handle = Arc::clone(&transport);
    let captured: Arc<Mutex<Option<TransportEventSender>>> = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&captured);

    let client = StreamClient::with_transport(DEFAULT_CHANNEL_CAPACITY, move |events| {
        *slot.lock() = Some(events);
        handle as SharedTransport
    });

    let events = captured.lock().take().unwrap();
    (client, transport, events)
}

/// Give the dispatcher task a chance to drain the event queue.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}

#[tokio::test]
async fn connected_event_flushes_queued_subscriptions() {
    let (client, transport, events) = setup();

    let feed = client.observe(["MSFT", "TWLO"]);
    let _listener = feed.attach();
    assert_eq!(transport.count(ControlAction::Subscribe, "MSFT"), 0);

    events.send(TransportEvent::Connected).unwrap();
    settle().await;

    assert_eq!(transport.count(ControlAction::Subscribe, "MSFT"), 1);
    assert_eq!(transport.count(ControlAction::Subscribe, "TWLO"), 1);
}

#[tokio::test]
async fn records_reach_listeners_through_the_dispatcher() {
    let (client, _transport, events) = setup();

    let mut listener = client.observe(["AAPL"]).attach();
    events.send(TransportEvent::Connected).unwrap();
    settle().await;

    let record = FeedMessage::new("AAPL", json!({ "symbol": "AAPL", "lastSalePrice": 187.0 }));
    events.send(TransportEvent::Message(record)).unwrap();

    let received = tokio::time::timeout(Duration::from_secs(1), listener.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(received.symbol, "AAPL");
    assert_eq!(received.payload["lastSalePrice"], 187.0);
}

#[tokio::test]
async fn shutdown_stops_the_dispatcher() {
    let (client, transport, events) = setup();

    events.send(TransportEvent::Connected).unwrap();
    settle().await;

    client.shutdown();
    settle().await;

    // Events after shutdown are never dispatched
    let _ = events.send(TransportEvent::Connected);
    settle().await;

    let feed = client.observe(["MSFT"]);
    let _listener = feed.attach();
    assert_eq!(transport.count(ControlAction::Subscribe, "MSFT"), 1);
}

#[tokio::test]
async fn listener_counts_are_visible_on_the_client() {
    let (client, _transport, events) = setup();
    events.send(TransportEvent::Connected).unwrap();
    settle().await;

    let feed = client.observe(["NVDA"]);
    let a = feed.attach();
    let b = feed.attach();
    assert_eq!(client.listener_count("NVDA"), 2);

    drop(a);
    drop(b);
    assert_eq!(client.listener_count("NVDA"), 0);
}

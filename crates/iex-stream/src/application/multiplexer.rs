//! Subscription Multiplexer
//!
//! Turns one shared push connection into independent per-symbol feeds.
//!
//! # Design
//!
//! One broadcast channel exists per observed symbol, created lazily on first
//! attach and kept for the lifetime of the multiplexer. Listeners hold
//! receivers; the multiplexer holds the senders and routes each inbound
//! record to the channel matching its symbol. Subscription lifecycles are
//! delegated to [`TopicRegistry`]: every attach/detach/readiness transition
//! runs under one lock, and the control directives it yields are handed to
//! the transport before the lock is released, so upstream traffic always
//! reflects transitions in the order they happened.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::{Stream, StreamExt, StreamMap};

use crate::application::ports::{SharedTransport, TransportEvent};
use crate::domain::message::{FeedMessage, Symbol};
use crate::domain::subscription::TopicRegistry;

// =============================================================================
// Constants
// =============================================================================

/// Default per-symbol broadcast channel capacity.
///
/// A listener that falls further behind than this loses the oldest records
/// for that symbol; nobody else is affected.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1_000;

// =============================================================================
// Multiplexer
// =============================================================================

/// Shared state behind the multiplexer lock.
struct MuxState {
    /// Ref-counted subscription state machine.
    registry: TopicRegistry,
    /// One broadcast sender per symbol ever observed.
    channels: HashMap<Symbol, broadcast::Sender<FeedMessage>>,
}

struct MuxInner {
    state: Mutex<MuxState>,
    transport: SharedTransport,
    capacity: usize,
}

/// Routes inbound records to per-symbol listeners and drives upstream
/// subscriptions from listener counts.
///
/// Cheap to clone; all clones share one subscription state.
#[derive(Clone)]
pub struct Multiplexer {
    inner: Arc<MuxInner>,
}

impl Multiplexer {
    /// Create a multiplexer over `transport` with the given per-symbol
    /// channel capacity.
    #[must_use]
    pub fn new(transport: SharedTransport, capacity: usize) -> Self {
        Self {
            inner: Arc::new(MuxInner {
                state: Mutex::new(MuxState {
                    registry: TopicRegistry::new(),
                    channels: HashMap::new(),
                }),
                transport,
                capacity,
            }),
        }
    }

    /// Create a lazy feed over the given symbols.
    ///
    /// Nothing is subscribed until the feed is attached. Duplicate symbols
    /// are collapsed, preserving first occurrence order.
    pub fn observe<I, S>(&self, symbols: I) -> Feed
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        let mut unique: Vec<Symbol> = Vec::new();
        for symbol in symbols {
            let symbol = symbol.into();
            if !unique.contains(&symbol) {
                unique.push(symbol);
            }
        }

        Feed {
            mux: self.clone(),
            symbols: unique,
        }
    }

    /// Apply one transport event.
    pub fn handle_event(&self, event: TransportEvent) {
        match event {
            TransportEvent::Connected => self.on_connect(),
            TransportEvent::Message(msg) => self.on_message(msg),
        }
    }

    /// Handle a connection-ready signal from the transport.
    pub fn on_connect(&self) {
        let mut state = self.inner.state.lock();
        let flushed = state.registry.mark_ready();
        if !flushed.is_empty() {
            tracing::debug!(
                count = flushed.len(),
                "transport ready, flushing queued subscriptions"
            );
        }
        for msg in flushed {
            self.inner.transport.send(msg);
        }
    }

    /// Route one inbound record to its symbol channel.
    ///
    /// Records for symbols nobody has ever observed are dropped.
    pub fn on_message(&self, msg: FeedMessage) {
        let state = self.inner.state.lock();
        match state.channels.get(&msg.symbol) {
            // A send error just means no receiver is attached right now
            Some(tx) => {
                let _ = tx.send(msg);
            }
            None => {
                tracing::trace!(symbol = %msg.symbol, "dropping record for unobserved symbol");
            }
        }
    }

    /// Current listener count for a symbol.
    #[must_use]
    pub fn listener_count(&self, symbol: &str) -> usize {
        self.inner.state.lock().registry.listener_count(symbol)
    }

    /// Register a listener on each symbol and hand back its receivers.
    fn attach(&self, symbols: &[Symbol]) -> Vec<(Symbol, broadcast::Receiver<FeedMessage>)> {
        let mut state = self.inner.state.lock();

        let mut receivers = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let tx = state
                .channels
                .entry(symbol.clone())
                .or_insert_with(|| broadcast::channel(self.inner.capacity).0);
            receivers.push((symbol.clone(), tx.subscribe()));
        }

        for msg in state.registry.attach(symbols) {
            self.inner.transport.send(msg);
        }

        receivers
    }

    /// Release a listener on each symbol.
    fn detach(&self, symbols: &[Symbol]) {
        let mut state = self.inner.state.lock();
        for msg in state.registry.detach(symbols) {
            self.inner.transport.send(msg);
        }
    }
}

// =============================================================================
// Feed
// =============================================================================

/// A lazy, shareable view over one or more symbols.
///
/// Holding a feed costs nothing upstream. Each [`Feed::attach`] starts an
/// independent ref-counted listener lifecycle, so one feed can back many
/// concurrent listeners.
#[derive(Clone)]
pub struct Feed {
    mux: Multiplexer,
    symbols: Vec<Symbol>,
}

impl Feed {
    /// Symbols this feed covers.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Attach a new listener, counting one reference per symbol.
    ///
    /// The first listener on a symbol triggers an upstream subscribe (or
    /// queues one until the transport is ready).
    #[must_use]
    pub fn attach(&self) -> FeedListener {
        let mut streams = StreamMap::new();
        for (symbol, rx) in self.mux.attach(&self.symbols) {
            streams.insert(symbol, BroadcastStream::new(rx));
        }

        FeedListener {
            mux: self.mux.clone(),
            symbols: self.symbols.clone(),
            streams,
            active: true,
        }
    }
}

// =============================================================================
// Feed Listener
// =============================================================================

/// An active listener over a feed's symbols.
///
/// Records from all covered symbols are merged into one stream, in per-symbol
/// delivery order. Dropping the listener detaches it; the last listener on a
/// symbol triggers the upstream unsubscribe.
pub struct FeedListener {
    mux: Multiplexer,
    symbols: Vec<Symbol>,
    streams: StreamMap<Symbol, BroadcastStream<FeedMessage>>,
    active: bool,
}

impl FeedListener {
    /// Receive the next record.
    ///
    /// Returns `None` once the listener is detached (or was attached to an
    /// empty symbol set). A listener that fell behind skips the lost records
    /// and keeps going.
    pub async fn recv(&mut self) -> Option<FeedMessage> {
        loop {
            match self.streams.next().await {
                Some((_, Ok(msg))) => return Some(msg),
                Some((symbol, Err(BroadcastStreamRecvError::Lagged(skipped)))) => {
                    tracing::warn!(symbol = %symbol, skipped, "listener fell behind, records skipped");
                }
                None => return None,
            }
        }
    }

    /// Release this listener's references.
    ///
    /// Idempotent: only the first call counts. After detach, [`Self::recv`]
    /// returns `None`.
    pub fn detach(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.streams = StreamMap::new();
        self.mux.detach(&self.symbols);
    }

    /// Whether this listener still holds its references.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Symbols this listener covers.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }
}

impl Stream for FeedListener {
    type Item = FeedMessage;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.streams).poll_next(cx) {
                Poll::Ready(Some((_, Ok(msg)))) => return Poll::Ready(Some(msg)),
                Poll::Ready(Some((symbol, Err(BroadcastStreamRecvError::Lagged(skipped))))) => {
                    tracing::warn!(symbol = %symbol, skipped, "listener fell behind, records skipped");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl Drop for FeedListener {
    fn drop(&mut self) {
        self.detach();
    }
}

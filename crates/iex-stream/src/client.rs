//! Stream Client Facade
//!
//! Owns the transport, the multiplexer, and the dispatcher task that moves
//! events between them.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::application::multiplexer::{Feed, Multiplexer};
use crate::application::ports::{SharedTransport, TransportEvent, TransportEventSender};
use crate::domain::message::Symbol;
use crate::infrastructure::settings::StreamSettings;
use crate::infrastructure::websocket::WebSocketTransport;

// =============================================================================
// Stream Client
// =============================================================================

/// Client for observing realtime per-symbol market data.
///
/// One client holds one upstream connection. Feeds created via
/// [`Self::observe`] are lazy; attaching a listener to a feed drives the
/// ref-counted subscribe/unsubscribe lifecycle on the shared connection.
///
/// After a reconnect the upstream starts with a clean slate; active symbols
/// are not re-sent. Callers that need continuity across drops should detach
/// and re-attach their listeners.
///
/// Must be constructed from within a tokio runtime.
pub struct StreamClient {
    mux: Multiplexer,
    cancel: CancellationToken,
}

impl StreamClient {
    /// Connect to the production realtime endpoint with default settings.
    #[must_use]
    pub fn connect() -> Self {
        Self::with_settings(StreamSettings::default())
    }

    /// Connect with explicit settings.
    #[must_use]
    pub fn with_settings(settings: StreamSettings) -> Self {
        let cancel = CancellationToken::new();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let capacity = settings.channel_capacity;
        let transport: SharedTransport =
            WebSocketTransport::spawn(settings, event_tx, cancel.clone());
        Self::assemble(capacity, transport, event_rx, cancel)
    }

    /// Build a client over a caller-supplied transport.
    ///
    /// The factory receives the sender the transport must use to push
    /// [`TransportEvent`]s inward.
    pub fn with_transport<F>(capacity: usize, factory: F) -> Self
    where
        F: FnOnce(TransportEventSender) -> SharedTransport,
    {
        let cancel = CancellationToken::new();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let transport = factory(event_tx);
        Self::assemble(capacity, transport, event_rx, cancel)
    }

    fn assemble(
        capacity: usize,
        transport: SharedTransport,
        mut event_rx: mpsc::UnboundedReceiver<TransportEvent>,
        cancel: CancellationToken,
    ) -> Self {
        let mux = Multiplexer::new(transport, capacity);

        let dispatcher = mux.clone();
        let dispatch_cancel = cancel.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = dispatch_cancel.cancelled() => break,
                    event = event_rx.recv() => match event {
                        Some(event) => dispatcher.handle_event(event),
                        None => break,
                    },
                }
            }
            tracing::debug!("dispatcher stopped");
        });

        Self { mux, cancel }
    }

    /// Create a lazy feed over the given symbols.
    ///
    /// Nothing is subscribed until a listener attaches to the feed.
    pub fn observe<I, S>(&self, symbols: I) -> Feed
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        self.mux.observe(symbols)
    }

    /// Current listener count for a symbol.
    #[must_use]
    pub fn listener_count(&self, symbol: &str) -> usize {
        self.mux.listener_count(symbol)
    }

    /// Stop the dispatcher and the transport task.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for StreamClient {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

//! WebSocket Transport Adapter
//!
//! Default transport for the realtime feed. A background task owns the
//! connection: it writes queued control directives, decodes inbound frames,
//! answers pings, and reconnects with exponential backoff. A `Connected`
//! event is pushed inward after every successful connect, including
//! reconnects; the upstream starts each connection with a clean slate.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{Transport, TransportEvent, TransportEventSender};
use crate::domain::message::ControlMessage;
use crate::infrastructure::codec::FrameCodec;
use crate::infrastructure::reconnect::ReconnectPolicy;
use crate::infrastructure::settings::StreamSettings;

// =============================================================================
// Errors
// =============================================================================

/// Errors from one connection attempt.
#[derive(Debug, thiserror::Error)]
pub enum SocketError {
    /// Underlying WebSocket failure.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The server closed the connection.
    #[error("connection closed by server")]
    ConnectionClosed,
}

// =============================================================================
// Transport Handle
// =============================================================================

/// Handle implementing [`Transport`] over a background socket task.
pub struct WebSocketTransport {
    control_tx: mpsc::UnboundedSender<ControlMessage>,
}

impl Transport for WebSocketTransport {
    fn send(&self, msg: ControlMessage) {
        // The receiver only drops at shutdown; directives after that are moot
        let _ = self.control_tx.send(msg);
    }
}

impl WebSocketTransport {
    /// Spawn the socket task and return the control handle.
    ///
    /// Must be called from within a tokio runtime. The task runs until
    /// `cancel` fires or the reconnect budget is spent.
    #[must_use]
    pub fn spawn(
        settings: StreamSettings,
        events: TransportEventSender,
        cancel: CancellationToken,
    ) -> Arc<Self> {
        let (control_tx, control_rx) = mpsc::unbounded_channel();

        let task = SocketTask {
            settings,
            codec: FrameCodec::new(),
            events,
            cancel,
        };
        tokio::spawn(task.run(control_rx));

        Arc::new(Self { control_tx })
    }
}

// =============================================================================
// Socket Task
// =============================================================================

struct SocketTask {
    settings: StreamSettings,
    codec: FrameCodec,
    events: TransportEventSender,
    cancel: CancellationToken,
}

impl SocketTask {
    async fn run(self, mut control_rx: mpsc::UnboundedReceiver<ControlMessage>) {
        let mut policy = ReconnectPolicy::new(self.settings.reconnect.clone());

        loop {
            if self.cancel.is_cancelled() {
                return;
            }

            match self.connect_and_run(&mut control_rx, &mut policy).await {
                Ok(()) => {
                    tracing::info!("stream connection stopped");
                    return;
                }
                Err(error) => {
                    tracing::warn!(error = %error, "stream connection error");
                }
            }

            let Some(delay) = policy.next_delay() else {
                tracing::error!(
                    attempts = policy.attempts(),
                    "reconnect budget spent, giving up on stream"
                );
                return;
            };

            tracing::info!(
                attempt = policy.attempts(),
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "reconnecting to stream"
            );

            tokio::select! {
                () = self.cancel.cancelled() => return,
                () = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Run one connection to completion.
    ///
    /// `Ok(())` means a deliberate stop (cancellation or client drop);
    /// errors feed the reconnect loop.
    async fn connect_and_run(
        &self,
        control_rx: &mut mpsc::UnboundedReceiver<ControlMessage>,
        policy: &mut ReconnectPolicy,
    ) -> Result<(), SocketError> {
        tracing::info!(url = %self.settings.url, "connecting to realtime feed");
        let (ws_stream, _response) = connect_async(&self.settings.url).await?;
        let (mut write, mut read) = ws_stream.split();

        policy.reset();
        let _ = self.events.send(TransportEvent::Connected);

        loop {
            tokio::select! {
                () = self.cancel.cancelled() => return Ok(()),

                directive = control_rx.recv() => {
                    let Some(msg) = directive else {
                        // Client handle dropped
                        return Ok(());
                    };
                    tracing::debug!(
                        action = msg.action.as_str(),
                        symbol = %msg.symbol,
                        "sending control directive"
                    );
                    let frame = self.codec.encode_control(&msg);
                    write.send(Message::Text(frame.into())).await?;
                }

                frame = read.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => self.forward_records(&text),
                        Some(Ok(Message::Ping(data))) => {
                            write.send(Message::Pong(data)).await?;
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            return Err(SocketError::ConnectionClosed);
                        }
                        Some(Ok(_)) => {}
                        Some(Err(error)) => return Err(error.into()),
                    }
                }
            }
        }
    }

    fn forward_records(&self, text: &str) {
        match self.codec.decode(text) {
            Ok(messages) => {
                for msg in messages {
                    let _ = self.events.send(TransportEvent::Message(msg));
                }
            }
            Err(error) => {
                tracing::debug!(error = %error, "ignoring undecodable frame");
            }
        }
    }
}

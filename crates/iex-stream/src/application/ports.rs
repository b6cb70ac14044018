//! Port Definitions
//!
//! The transport boundary. Adapters implement [`Transport`] for outbound
//! control traffic and push [`TransportEvent`]s inward over a channel handed
//! to them at construction.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::domain::message::{ControlMessage, FeedMessage};

// =============================================================================
// Inbound Events
// =============================================================================

/// Event pushed into the multiplexer by a transport adapter.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// The connection is established and control traffic may flow.
    ///
    /// Emitted once per successful connect, including reconnects.
    Connected,
    /// An inbound market data record.
    Message(FeedMessage),
}

/// Sender half used by transport adapters to push events inward.
pub type TransportEventSender = mpsc::UnboundedSender<TransportEvent>;

// =============================================================================
// Outbound Control
// =============================================================================

/// Outbound side of a push transport.
///
/// `send` must not block: adapters enqueue the directive and write it from
/// their own task. Listener detach runs from `Drop`, so this cannot be async.
pub trait Transport: Send + Sync {
    /// Queue a control directive for delivery upstream.
    fn send(&self, msg: ControlMessage);
}

/// Shared handle to a transport adapter.
pub type SharedTransport = Arc<dyn Transport>;

#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::default_trait_access
    )
)]

//! IEX Realtime Stream Client
//!
//! Maintains a single WebSocket connection to the IEX realtime feed and
//! multiplexes per-symbol market data to any number of in-process listeners.
//! Listeners for the same symbol share one upstream subscription: the first
//! attach sends `subscribe`, the last detach sends `unsubscribe`, and anything
//! attached before the connection is up is flushed once it becomes ready.
//!
//! # Layers (inside -> outside)
//!
//! - **Domain**: Core subscription logic and data types
//!   - `message`: Feed records and subscription control directives
//!   - `subscription`: Ref-counted topic tracking and readiness gating
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: Transport interface and the events it pushes inward
//!   - `multiplexer`: Per-symbol fan-out, feed handles, listeners
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `websocket`: WebSocket transport with reconnection
//!   - `codec`: JSON frame encoding/decoding
//!   - `reconnect`: Exponential backoff policy
//!   - `settings`: Environment-driven configuration
//!   - `telemetry`: Tracing subscriber setup
//!
//! # Data Flow
//!
//! ```text
//!                      ┌─────────────┐     ┌─────────────┐──► Listener 1
//! IEX realtime WS ────►│  WebSocket  │────►│ Multiplexer │──► Listener 2
//!                      │  Transport  │◄────│ (refcounts) │──► Listener N
//!                      └─────────────┘     └─────────────┘
//!                            ▲  subscribe / unsubscribe
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Core subscription logic with no external I/O.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

mod client;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::message::{ControlAction, ControlMessage, FeedMessage, Symbol};
pub use domain::subscription::TopicRegistry;

// Application types
pub use application::multiplexer::{DEFAULT_CHANNEL_CAPACITY, Feed, FeedListener, Multiplexer};
pub use application::ports::{SharedTransport, Transport, TransportEvent, TransportEventSender};

// Client facade
pub use client::StreamClient;

// Infrastructure
pub use infrastructure::codec::{CodecError, FrameCodec};
pub use infrastructure::reconnect::{ReconnectPolicy, ReconnectSettings};
pub use infrastructure::settings::{DEFAULT_STREAM_URL, StreamSettings};
pub use infrastructure::telemetry::init as init_tracing;
pub use infrastructure::websocket::WebSocketTransport;

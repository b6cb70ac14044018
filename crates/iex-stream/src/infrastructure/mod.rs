//! Infrastructure Layer - Adapters and external integrations.
//!
//! Concrete implementations of the transport port defined in the
//! application layer, plus configuration and observability plumbing.

/// WebSocket transport adapter with automatic reconnection.
pub mod websocket;

/// JSON frame encoding and decoding.
pub mod codec;

/// Exponential backoff policy for reconnection.
pub mod reconnect;

/// Environment-driven configuration.
pub mod settings;

/// Tracing subscriber setup.
pub mod telemetry;

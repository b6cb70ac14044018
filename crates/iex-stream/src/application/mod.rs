//! Application Layer - Use cases and port definitions.
//!
//! This layer wires the domain subscription logic to a transport and
//! fans inbound records out to listeners.

/// Transport interface and the events it pushes inward.
pub mod ports;

/// Per-symbol fan-out, feed handles, listeners.
pub mod multiplexer;

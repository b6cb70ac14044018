//! Domain Layer - Core subscription logic and data types.
//!
//! This layer contains the subscription state machine and the message
//! types that flow through the client. All types here are pure Rust
//! with no I/O.

/// Feed records and subscription control directives.
pub mod message;

/// Ref-counted topic tracking and readiness gating.
pub mod subscription;

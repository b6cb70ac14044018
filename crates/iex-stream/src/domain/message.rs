//! Feed Messages and Control Directives
//!
//! Wire-facing data types. Inbound market data is carried opaquely as JSON
//! keyed by symbol; outbound traffic is limited to subscribe/unsubscribe
//! directives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Symbol
// =============================================================================

/// A security identifier (ticker symbol) used as a subscription topic.
///
/// No structure is imposed beyond equality and hashing. The upstream feed,
/// not this client, is the authority on whether a symbol is valid.
pub type Symbol = String;

// =============================================================================
// Control Messages
// =============================================================================

/// Direction of a subscription control directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlAction {
    /// Start receiving updates for a symbol.
    Subscribe,
    /// Stop receiving updates for a symbol.
    Unsubscribe,
}

impl ControlAction {
    /// Wire name of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Subscribe => "subscribe",
            Self::Unsubscribe => "unsubscribe",
        }
    }
}

/// A subscribe or unsubscribe directive bound for the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlMessage {
    /// Requested action.
    pub action: ControlAction,
    /// Symbol the action applies to.
    pub symbol: Symbol,
}

impl ControlMessage {
    /// Create a subscribe directive for `symbol`.
    #[must_use]
    pub fn subscribe(symbol: impl Into<Symbol>) -> Self {
        Self {
            action: ControlAction::Subscribe,
            symbol: symbol.into(),
        }
    }

    /// Create an unsubscribe directive for `symbol`.
    #[must_use]
    pub fn unsubscribe(symbol: impl Into<Symbol>) -> Self {
        Self {
            action: ControlAction::Unsubscribe,
            symbol: symbol.into(),
        }
    }
}

// =============================================================================
// Feed Messages
// =============================================================================

/// One inbound market data record.
///
/// The payload is passed through verbatim. This client routes on the symbol
/// and imposes no schema on the rest of the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedMessage {
    /// Symbol the record belongs to.
    pub symbol: Symbol,
    /// The full record as received.
    pub payload: Value,
    /// When this client received the record.
    pub received_at: DateTime<Utc>,
}

impl FeedMessage {
    /// Create a message stamped with the current time.
    #[must_use]
    pub fn new(symbol: impl Into<Symbol>, payload: Value) -> Self {
        Self {
            symbol: symbol.into(),
            payload,
            received_at: Utc::now(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

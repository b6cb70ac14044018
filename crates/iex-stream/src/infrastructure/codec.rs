//! Realtime Frame Codec
//!
//! JSON encoding for the realtime feed. Outbound control directives become
//! named-event frames; inbound frames are one data record or an array of
//! them, each keyed by a `symbol` field. Records without a symbol cannot be
//! routed and are skipped.

use serde_json::Value;

use crate::domain::message::{ControlMessage, FeedMessage};

/// Field carrying the security identifier in every data record.
const SYMBOL_FIELD: &str = "symbol";

// =============================================================================
// Errors
// =============================================================================

/// Errors that can occur while decoding frames.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// JSON parse failure.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Parsed, but not a shape the feed produces.
    #[error("invalid frame: {0}")]
    InvalidFrame(String),
}

// =============================================================================
// Codec
// =============================================================================

/// JSON codec for the realtime feed.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameCodec;

impl FrameCodec {
    /// Create a codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Encode a control directive as a named-event frame.
    ///
    /// Produces e.g. `{"event":"subscribe","data":"MSFT"}`.
    #[must_use]
    pub fn encode_control(&self, msg: &ControlMessage) -> String {
        serde_json::json!({
            "event": msg.action.as_str(),
            "data": msg.symbol,
        })
        .to_string()
    }

    /// Decode an inbound text frame into data records.
    ///
    /// Accepts a single JSON object or an array of objects. Records without
    /// a string `symbol` field are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame is not valid JSON, or parses to
    /// something other than an object or array.
    pub fn decode(&self, text: &str) -> Result<Vec<FeedMessage>, CodecError> {
        let value: Value = serde_json::from_str(text)?;

        let records = match value {
            Value::Array(items) => items,
            obj @ Value::Object(_) => vec![obj],
            other => {
                return Err(CodecError::InvalidFrame(format!(
                    "expected object or array, got {other}"
                )));
            }
        };

        let mut messages = Vec::with_capacity(records.len());
        for record in records {
            let symbol = record
                .get(SYMBOL_FIELD)
                .and_then(Value::as_str)
                .map(str::to_owned);
            match symbol {
                Some(symbol) => messages.push(FeedMessage::new(symbol, record)),
                None => tracing::debug!("skipping record without a symbol field"),
            }
        }

        Ok(messages)
    }
}

// =============================================================================
// Tests
// =============================================================================

//! Topic Subscription Tracking
//!
//! Ref-counted subscription state for the realtime feed.
//!
//! # Design
//!
//! The registry tracks, per symbol:
//! - How many listeners are currently attached
//! - Whether an upstream subscription is active
//!
//! Multiple listeners share one upstream subscription: `subscribe` goes out
//! only when the count rises from zero, `unsubscribe` only when it falls back
//! to zero. Until the transport reports ready, wanted symbols are parked in a
//! pending queue and flushed exactly once on the first readiness signal.
//!
//! This type does no I/O. Every transition returns the control directives it
//! implies, in order, for the caller to forward to the transport.

use std::collections::HashMap;

use crate::domain::message::{ControlMessage, Symbol};

// =============================================================================
// Per-Symbol State
// =============================================================================

/// Listener count and wire state for one symbol.
#[derive(Debug, Default)]
struct TopicState {
    /// Number of currently attached listeners.
    listeners: usize,
    /// Whether an upstream subscription has been sent and not yet revoked.
    subscribed: bool,
}

// =============================================================================
// Topic Registry
// =============================================================================

/// Tracks listener counts and upstream wire state for every observed symbol.
#[derive(Debug, Default)]
pub struct TopicRegistry {
    /// Whether the transport currently accepts control traffic.
    ready: bool,
    /// Per-symbol state, kept for the lifetime of the registry.
    topics: HashMap<Symbol, TopicState>,
    /// Symbols wanted before the transport came up, in first-request order.
    pending: Vec<Symbol>,
}

impl TopicRegistry {
    /// Create an empty registry in the not-ready state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the transport has reported ready.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    /// Current listener count for a symbol.
    #[must_use]
    pub fn listener_count(&self, symbol: &str) -> usize {
        self.topics.get(symbol).map_or(0, |state| state.listeners)
    }

    /// Symbols queued for subscription on the next readiness signal.
    #[must_use]
    pub fn pending_symbols(&self) -> &[Symbol] {
        &self.pending
    }

    /// Register one new listener for each symbol.
    ///
    /// Returns the subscribe directives implied by counts rising from zero.
    /// Before readiness no directives are returned; the symbols are queued
    /// instead.
    pub fn attach(&mut self, symbols: &[Symbol]) -> Vec<ControlMessage> {
        let mut out = Vec::new();

        for symbol in symbols {
            let state = self.topics.entry(symbol.clone()).or_default();
            state.listeners += 1;

            // Only the first listener can change wire state
            if state.listeners > 1 || state.subscribed {
                continue;
            }

            if self.ready {
                state.subscribed = true;
                out.push(ControlMessage::subscribe(symbol.clone()));
            } else if !self.pending.contains(symbol) {
                self.pending.push(symbol.clone());
            }
        }

        out
    }

    /// Release one listener for each symbol.
    ///
    /// Returns the unsubscribe directives implied by counts falling to zero.
    /// Releasing a symbol with no listeners is a no-op.
    pub fn detach(&mut self, symbols: &[Symbol]) -> Vec<ControlMessage> {
        let mut out = Vec::new();

        for symbol in symbols {
            let Some(state) = self.topics.get_mut(symbol) else {
                continue;
            };
            if state.listeners == 0 {
                continue;
            }

            state.listeners -= 1;
            if state.listeners > 0 {
                continue;
            }

            if state.subscribed {
                state.subscribed = false;
                out.push(ControlMessage::unsubscribe(symbol.clone()));
            } else {
                // Wanted before the transport came up, abandoned before it did
                self.pending.retain(|pending| pending != symbol);
            }
        }

        out
    }

    /// Record that the transport accepts control traffic.
    ///
    /// Returns subscribe directives for every queued symbol that still has
    /// listeners, in first-request order. Repeat readiness signals return
    /// nothing; already-subscribed symbols are never re-sent.
    pub fn mark_ready(&mut self) -> Vec<ControlMessage> {
        self.ready = true;

        let pending = std::mem::take(&mut self.pending);
        let mut out = Vec::with_capacity(pending.len());

        for symbol in pending {
            if let Some(state) = self.topics.get_mut(&symbol)
                && state.listeners > 0
                && !state.subscribed
            {
                state.subscribed = true;
                out.push(ControlMessage::subscribe(symbol));
            }
        }

        out
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::message::ControlAction;

    fn symbols(names: &[&str]) -> Vec<Symbol> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn attach_before_ready_queues_without_directives() {
        let mut registry = TopicRegistry::new();
        let out = registry.attach(&symbols(&["MSFT", "TWLO"]));

        assert!(out.is_empty());
        assert_eq!(registry.pending_symbols(), symbols(&["MSFT", "TWLO"]));
    }

    #[test]
    fn mark_ready_flushes_pending_in_order() {
        let mut registry = TopicRegistry::new();
        registry.attach(&symbols(&["MSFT"]));
        registry.attach(&symbols(&["TWLO"]));

        let out = registry.mark_ready();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], ControlMessage::subscribe("MSFT"));
        assert_eq!(out[1], ControlMessage::subscribe("TWLO"));
        assert!(registry.pending_symbols().is_empty());
    }

    #[test]
    fn repeat_ready_signals_flush_nothing() {
        let mut registry = TopicRegistry::new();
        registry.attach(&symbols(&["MSFT"]));

        assert_eq!(registry.mark_ready().len(), 1);
        assert!(registry.mark_ready().is_empty());
        assert!(registry.mark_ready().is_empty());
    }

    #[test]
    fn attach_after_ready_subscribes_immediately() {
        let mut registry = TopicRegistry::new();
        registry.mark_ready();

        let out = registry.attach(&symbols(&["AAPL"]));
        assert_eq!(out, vec![ControlMessage::subscribe("AAPL")]);
    }

    #[test]
    fn second_listener_does_not_resubscribe() {
        let mut registry = TopicRegistry::new();
        registry.mark_ready();

        registry.attach(&symbols(&["AAPL"]));
        let out = registry.attach(&symbols(&["AAPL"]));

        assert!(out.is_empty());
        assert_eq!(registry.listener_count("AAPL"), 2);
    }

    #[test]
    fn unsubscribe_only_when_last_listener_leaves() {
        let mut registry = TopicRegistry::new();
        registry.mark_ready();
        registry.attach(&symbols(&["AAPL"]));
        registry.attach(&symbols(&["AAPL"]));

        assert!(registry.detach(&symbols(&["AAPL"])).is_empty());

        let out = registry.detach(&symbols(&["AAPL"]));
        assert_eq!(out, vec![ControlMessage::unsubscribe("AAPL")]);
    }

    #[test]
    fn detach_with_no_listeners_is_noop() {
        let mut registry = TopicRegistry::new();
        registry.mark_ready();
        registry.attach(&symbols(&["AAPL"]));
        registry.detach(&symbols(&["AAPL"]));

        assert!(registry.detach(&symbols(&["AAPL"])).is_empty());
        assert!(registry.detach(&symbols(&["NVDA"])).is_empty());
    }

    #[test]
    fn detach_before_ready_cancels_pending() {
        let mut registry = TopicRegistry::new();
        registry.attach(&symbols(&["MSFT", "TWLO"]));
        registry.detach(&symbols(&["MSFT"]));

        let out = registry.mark_ready();
        assert_eq!(out, vec![ControlMessage::subscribe("TWLO")]);
    }

    #[test]
    fn reattach_after_full_release_resubscribes() {
        let mut registry = TopicRegistry::new();
        registry.mark_ready();
        registry.attach(&symbols(&["AAPL"]));
        registry.detach(&symbols(&["AAPL"]));

        let out = registry.attach(&symbols(&["AAPL"]));
        assert_eq!(out, vec![ControlMessage::subscribe("AAPL")]);
    }

    #[test]
    fn multi_symbol_attach_counts_each_symbol_once() {
        let mut registry = TopicRegistry::new();
        registry.mark_ready();

        let out = registry.attach(&symbols(&["MSFT", "TWLO"]));
        assert_eq!(out.len(), 2);
        assert!(
            out.iter()
                .all(|msg| msg.action == ControlAction::Subscribe)
        );
        assert_eq!(registry.listener_count("MSFT"), 1);
        assert_eq!(registry.listener_count("TWLO"), 1);
    }
}

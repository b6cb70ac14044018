//! Stream Client Settings
//!
//! Configuration for the realtime client, loaded from environment variables.
//! Every setting has a working default; no variable is required.

use std::time::Duration;

use crate::application::multiplexer::DEFAULT_CHANNEL_CAPACITY;
use crate::infrastructure::reconnect::ReconnectSettings;

/// Production realtime endpoint (TOPS feed).
pub const DEFAULT_STREAM_URL: &str = "wss://ws-api.iextrading.com/1.0/tops";

// =============================================================================
// Settings
// =============================================================================

/// Complete realtime client configuration.
#[derive(Debug, Clone)]
pub struct StreamSettings {
    /// Realtime endpoint URL.
    pub url: String,
    /// Capacity of each per-symbol broadcast channel.
    pub channel_capacity: usize,
    /// Reconnection backoff behavior.
    pub reconnect: ReconnectSettings,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_STREAM_URL.to_string(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            reconnect: ReconnectSettings::default(),
        }
    }
}

impl StreamSettings {
    /// Create configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    ///
    /// Recognized variables:
    /// - `IEX_STREAM_URL`
    /// - `IEX_STREAM_CHANNEL_CAPACITY`
    /// - `IEX_STREAM_RECONNECT_DELAY_INITIAL_MS`
    /// - `IEX_STREAM_RECONNECT_DELAY_MAX_SECS`
    /// - `IEX_STREAM_RECONNECT_DELAY_MULTIPLIER`
    /// - `IEX_STREAM_MAX_RECONNECT_ATTEMPTS`
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let reconnect = ReconnectSettings {
            initial_delay: parse_env_duration_millis(
                "IEX_STREAM_RECONNECT_DELAY_INITIAL_MS",
                defaults.reconnect.initial_delay,
            ),
            max_delay: parse_env_duration_secs(
                "IEX_STREAM_RECONNECT_DELAY_MAX_SECS",
                defaults.reconnect.max_delay,
            ),
            multiplier: parse_env_f64(
                "IEX_STREAM_RECONNECT_DELAY_MULTIPLIER",
                defaults.reconnect.multiplier,
            ),
            max_attempts: parse_env_u32(
                "IEX_STREAM_MAX_RECONNECT_ATTEMPTS",
                defaults.reconnect.max_attempts,
            ),
        };

        Self {
            url: std::env::var("IEX_STREAM_URL").unwrap_or(defaults.url),
            channel_capacity: parse_env_usize(
                "IEX_STREAM_CHANNEL_CAPACITY",
                defaults.channel_capacity,
            ),
            reconnect,
        }
    }
}

// =============================================================================
// Env Parsing Helpers
// =============================================================================

fn parse_env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_env_duration_secs(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_secs)
}

fn parse_env_duration_millis(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_millis)
}

// =============================================================================
// Tests
// =============================================================================

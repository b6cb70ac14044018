//! Reconnection Policy
//!
//! Exponential backoff with jitter for the WebSocket transport. Each failed
//! connection widens the delay up to a cap; jitter keeps a fleet of clients
//! from reconnecting in lockstep.

use std::time::Duration;

use rand::Rng;

/// Fraction of the delay randomized in each direction.
const JITTER_FACTOR: f64 = 0.1;

// =============================================================================
// Settings
// =============================================================================

/// Backoff behavior for reconnection attempts.
#[derive(Debug, Clone)]
pub struct ReconnectSettings {
    /// Delay before the first reconnection attempt.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Growth factor applied after each attempt.
    pub multiplier: f64,
    /// Maximum number of attempts (0 = unlimited).
    pub max_attempts: u32,
}

impl Default for ReconnectSettings {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            max_attempts: 0,
        }
    }
}

// =============================================================================
// Policy
// =============================================================================

/// Stateful backoff tracker for one connection loop.
#[derive(Debug)]
pub struct ReconnectPolicy {
    settings: ReconnectSettings,
    current_delay: Duration,
    attempts: u32,
}

impl ReconnectPolicy {
    /// Create a fresh policy.
    #[must_use]
    pub const fn new(settings: ReconnectSettings) -> Self {
        let current_delay = settings.initial_delay;
        Self {
            settings,
            current_delay,
            attempts: 0,
        }
    }

    /// Delay to wait before the next attempt, with jitter applied.
    ///
    /// Returns `None` once the attempt budget is spent.
    #[must_use]
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.settings.max_attempts > 0 && self.attempts >= self.settings.max_attempts {
            return None;
        }
        self.attempts += 1;

        let delay = jittered(self.current_delay);

        #[allow(clippy::cast_precision_loss)]
        let grown = (self.current_delay.as_millis() as f64 * self.settings.multiplier).round();
        let grown_millis = if grown.is_finite() && grown > 0.0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                grown as u128
            }
        } else {
            // Degenerate multiplier (zero, negative, NaN): hold the floor
            // instead of collapsing into a hot reconnect loop
            self.settings.initial_delay.as_millis()
        };
        let capped = grown_millis.min(self.settings.max_delay.as_millis());
        self.current_delay = Duration::from_millis(u64::try_from(capped).unwrap_or(u64::MAX));

        Some(delay)
    }

    /// Reset after a successful connection.
    pub const fn reset(&mut self) {
        self.current_delay = self.settings.initial_delay;
        self.attempts = 0;
    }

    /// Attempts made since the last reset.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }
}

/// Randomize a delay by up to `JITTER_FACTOR` in either direction.
fn jittered(duration: Duration) -> Duration {
    #[allow(clippy::cast_precision_loss)]
    let base_millis = duration.as_millis() as f64;
    let range = base_millis * JITTER_FACTOR;
    if range <= 0.0 {
        return duration;
    }

    let mut rng = rand::rng();
    let jitter: f64 = rng.random_range(-range..=range);
    let adjusted = (base_millis + jitter).max(1.0);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let adjusted_millis = adjusted as u64;
    Duration::from_millis(adjusted_millis)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_values() {
        let settings = ReconnectSettings::default();
        assert_eq!(settings.initial_delay, Duration::from_millis(500));
        assert_eq!(settings.max_delay, Duration::from_secs(30));
        assert!((settings.multiplier - 2.0).abs() < f64::EPSILON);
        assert_eq!(settings.max_attempts, 0);
    }

    #[test]
    fn delay_grows_toward_the_cap() {
        let mut policy = ReconnectPolicy::new(ReconnectSettings {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(400),
            multiplier: 2.0,
            max_attempts: 0,
        });

        // Jitter is ±10%, so compare against generous bounds
        let first = policy.next_delay().unwrap();
        assert!(first >= Duration::from_millis(90) && first <= Duration::from_millis(110));

        let second = policy.next_delay().unwrap();
        assert!(second >= Duration::from_millis(180) && second <= Duration::from_millis(220));

        // The fourth delay and beyond stay at the cap
        let _ = policy.next_delay();
        let fourth = policy.next_delay().unwrap();
        assert!(fourth >= Duration::from_millis(360) && fourth <= Duration::from_millis(440));
    }

    #[test]
    fn attempt_budget_is_enforced() {
        let mut policy = ReconnectPolicy::new(ReconnectSettings {
            max_attempts: 2,
            ..ReconnectSettings::default()
        });

        assert!(policy.next_delay().is_some());
        assert!(policy.next_delay().is_some());
        assert!(policy.next_delay().is_none());
        assert_eq!(policy.attempts(), 2);
    }

    #[test]
    fn zero_max_attempts_means_unlimited() {
        let mut policy = ReconnectPolicy::new(ReconnectSettings {
            max_attempts: 0,
            ..ReconnectSettings::default()
        });

        for _ in 0..50 {
            assert!(policy.next_delay().is_some());
        }
    }

    #[test]
    fn degenerate_multiplier_never_collapses_the_delay() {
        for multiplier in [0.0, -2.0, f64::NAN] {
            let mut policy = ReconnectPolicy::new(ReconnectSettings {
                initial_delay: Duration::from_millis(100),
                max_delay: Duration::from_secs(1),
                multiplier,
                max_attempts: 0,
            });

            // Every delay stays at the floor (±10% jitter), never zero
            for _ in 0..5 {
                let delay = policy.next_delay().unwrap();
                assert!(delay >= Duration::from_millis(90));
                assert!(delay <= Duration::from_millis(110));
            }
        }
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut policy = ReconnectPolicy::new(ReconnectSettings {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            max_attempts: 3,
        });

        let _ = policy.next_delay();
        let _ = policy.next_delay();
        policy.reset();

        assert_eq!(policy.attempts(), 0);
        let delay = policy.next_delay().unwrap();
        assert!(delay >= Duration::from_millis(90) && delay <= Duration::from_millis(110));
    }
}

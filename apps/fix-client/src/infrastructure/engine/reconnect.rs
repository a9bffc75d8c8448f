//! Reconnection Policy
//!
//! Exponential backoff with jitter between TCP connection attempts made
//! before the session logs on.

use std::time::Duration;

use rand::Rng;

use crate::application::ports::InitiatorSettings;

/// Backoff parameters.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Growth factor per retry.
    pub multiplier: f64,
    /// Jitter as a fraction of the delay (0.1 = ±10%).
    pub jitter_factor: f64,
    /// Retries after the first attempt (0 = unlimited).
    pub max_attempts: u32,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
            jitter_factor: 0.1,
            max_attempts: 3,
        }
    }
}

impl ReconnectConfig {
    /// Derive from initiator settings. The cap is eight initial delays.
    #[must_use]
    pub fn from_initiator_settings(settings: &InitiatorSettings) -> Self {
        Self {
            initial_delay: settings.reconnect_interval,
            max_delay: settings.reconnect_interval * 8,
            max_attempts: settings.max_reconnect_attempts,
            ..Self::default()
        }
    }
}

/// Backoff state across connection attempts.
#[derive(Debug)]
pub struct ReconnectPolicy {
    config: ReconnectConfig,
    current_delay: Duration,
    attempt_count: u32,
}

impl ReconnectPolicy {
    /// Create a policy.
    #[must_use]
    pub const fn new(config: ReconnectConfig) -> Self {
        let initial_delay = config.initial_delay;
        Self {
            config,
            current_delay: initial_delay,
            attempt_count: 0,
        }
    }

    /// Delay before the next retry, or `None` once retries are exhausted.
    #[must_use]
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.config.max_attempts > 0 && self.attempt_count >= self.config.max_attempts {
            return None;
        }

        self.attempt_count += 1;

        let delay_with_jitter = self.apply_jitter(self.current_delay);

        #[allow(clippy::cast_precision_loss)]
        let scaled = (self.current_delay.as_millis() as f64 * self.config.multiplier).round();
        let next_millis = if scaled.is_finite() && scaled > 0.0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                scaled as u128
            }
        } else {
            0
        };
        let capped = next_millis.min(self.config.max_delay.as_millis());
        self.current_delay = Duration::from_millis(u64::try_from(capped).unwrap_or(u64::MAX));

        Some(delay_with_jitter)
    }

    /// Retries used so far.
    #[must_use]
    pub const fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    fn apply_jitter(&self, duration: Duration) -> Duration {
        if self.config.jitter_factor <= 0.0 || duration.is_zero() {
            return duration;
        }

        #[allow(clippy::cast_precision_loss)]
        let base_millis = duration.as_millis() as f64;
        let jitter_range = base_millis * self.config.jitter_factor;
        let jitter: f64 = rand::rng().random_range(-jitter_range..=jitter_range);
        let adjusted_millis = (base_millis + jitter).max(1.0);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let adjusted_u64 = adjusted_millis as u64;
        Duration::from_millis(adjusted_u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_jitter(initial_ms: u64, max_ms: u64, max_attempts: u32) -> ReconnectPolicy {
        ReconnectPolicy::new(ReconnectConfig {
            initial_delay: Duration::from_millis(initial_ms),
            max_delay: Duration::from_millis(max_ms),
            multiplier: 2.0,
            jitter_factor: 0.0,
            max_attempts,
        })
    }

    #[test]
    fn derives_from_initiator_settings() {
        let settings = InitiatorSettings {
            name: "gw".to_string(),
            host: "127.0.0.1".to_string(),
            port: 9876,
            socket_timeout: Duration::ZERO,
            heartbeat_interval: Duration::from_secs(30),
            reconnect_interval: Duration::from_secs(2),
            max_reconnect_attempts: 4,
        };
        let config = ReconnectConfig::from_initiator_settings(&settings);
        assert_eq!(config.initial_delay, Duration::from_secs(2));
        assert_eq!(config.max_delay, Duration::from_secs(16));
        assert_eq!(config.max_attempts, 4);
    }

    #[test]
    fn policy_exponential_backoff() {
        let mut policy = no_jitter(100, 10_000, 0);
        let delays: Vec<_> = (0..4).filter_map(|_| policy.next_delay()).collect();
        assert_eq!(
            delays,
            [100, 200, 400, 800].map(Duration::from_millis).to_vec()
        );
    }

    #[test]
    fn policy_max_delay_cap() {
        let mut policy = no_jitter(1000, 1500, 0);
        let _ = policy.next_delay();
        assert_eq!(policy.next_delay(), Some(Duration::from_millis(1500)));
        assert_eq!(policy.next_delay(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn policy_max_attempts() {
        let mut policy = no_jitter(100, 1000, 3);
        for expected in 1..=3 {
            assert!(policy.next_delay().is_some());
            assert_eq!(policy.attempt_count(), expected);
        }
        assert!(policy.next_delay().is_none());
    }

    #[test]
    fn zero_interval_stays_zero() {
        let mut policy = ReconnectPolicy::new(ReconnectConfig {
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            ..ReconnectConfig::default()
        });
        assert_eq!(policy.next_delay(), Some(Duration::ZERO));
    }

    #[test]
    fn policy_jitter_bounds() {
        for _ in 0..100 {
            let mut policy = ReconnectPolicy::new(ReconnectConfig {
                initial_delay: Duration::from_millis(1000),
                max_delay: Duration::from_secs(10),
                multiplier: 2.0,
                jitter_factor: 0.1,
                max_attempts: 0,
            });
            let millis = policy.next_delay().unwrap().as_millis();
            assert!((900..=1100).contains(&millis), "delay {millis}ms out of bounds");
        }
    }
}

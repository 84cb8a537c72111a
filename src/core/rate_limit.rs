//! Request rate-limiting collaborators
//!
//! The limiter is a passed-in object owned by [`crate::server::AppState`],
//! never a process-wide singleton, so tests can swap in [`Unlimited`] and
//! exercise handlers without clock coupling.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Outcome of a rate-limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Limited,
}

/// Trait for rate limiters, keyed by caller identity
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Record one request for `key` and decide whether it may proceed
    async fn check(&self, key: &str) -> RateDecision;
}

/// Limiter that never limits. Used when rate limiting is disabled.
pub struct Unlimited;

#[async_trait]
impl RateLimiter for Unlimited {
    async fn check(&self, _key: &str) -> RateDecision {
        RateDecision::Allowed
    }
}

/// Fixed-window limiter: at most `max_requests` per `window` per key.
///
/// Windows reset on the first request after expiry. Good enough for a
/// single-process deployment; a shared deployment would swap in a limiter
/// backed by external storage behind the same trait.
pub struct FixedWindowLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<String, (Instant, u32)>>,
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RateLimiter for FixedWindowLimiter {
    async fn check(&self, key: &str) -> RateDecision {
        let now = Instant::now();
        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            // A poisoned counter map fails open: dropping rate limiting is
            // preferable to failing every request.
            Err(poisoned) => poisoned.into_inner(),
        };

        let entry = windows.entry(key.to_string()).or_insert((now, 0));
        if now.duration_since(entry.0) >= self.window {
            *entry = (now, 0);
        }

        if entry.1 >= self.max_requests {
            return RateDecision::Limited;
        }

        entry.1 += 1;
        RateDecision::Allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unlimited_always_allows() {
        let limiter = Unlimited;
        for _ in 0..1000 {
            assert_eq!(limiter.check("k").await, RateDecision::Allowed);
        }
    }

    #[tokio::test]
    async fn test_fixed_window_limits_after_max() {
        let limiter = FixedWindowLimiter::new(3, Duration::from_secs(60));

        assert_eq!(limiter.check("a").await, RateDecision::Allowed);
        assert_eq!(limiter.check("a").await, RateDecision::Allowed);
        assert_eq!(limiter.check("a").await, RateDecision::Allowed);
        assert_eq!(limiter.check("a").await, RateDecision::Limited);
    }

    #[tokio::test]
    async fn test_fixed_window_keys_are_independent() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_secs(60));

        assert_eq!(limiter.check("a").await, RateDecision::Allowed);
        assert_eq!(limiter.check("b").await, RateDecision::Allowed);
        assert_eq!(limiter.check("a").await, RateDecision::Limited);
    }

    #[tokio::test]
    async fn test_fixed_window_resets_after_expiry() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_millis(20));

        assert_eq!(limiter.check("a").await, RateDecision::Allowed);
        assert_eq!(limiter.check("a").await, RateDecision::Limited);

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(limiter.check("a").await, RateDecision::Allowed);
    }
}

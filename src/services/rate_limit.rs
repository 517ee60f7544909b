// Demo Rate Limiter
// Counts demo attempts per client key inside a rolling window

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::DemoQuota;
use crate::services::config_store::DemoConfig;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RateLimitError {
    #[error("demo limit reached after {tries_used} attempts")]
    LimitReached { tries_used: u32 },
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub trait RateLimiter: Send + Sync {
    /// Record an attempt for `key` at `now`; false when it is refused.
    fn check(&self, key: &str, now: DateTime<Utc>) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct Attempts {
    count: u32,
    last_try: DateTime<Utc>,
}

pub struct DemoRateLimiter {
    max_attempts: u32,
    window: Duration,
    clock: Arc<dyn Clock>,
    visits: Mutex<HashMap<String, Attempts>>,
}

impl DemoRateLimiter {
    pub fn new(max_attempts: u32, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            max_attempts,
            window,
            clock,
            visits: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &DemoConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(config.max_attempts, Duration::hours(config.window_hours), clock)
    }

    fn visits(&self) -> MutexGuard<'_, HashMap<String, Attempts>> {
        self.visits.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn live_count(&self, attempts: Option<&Attempts>, now: DateTime<Utc>) -> u32 {
        match attempts {
            Some(a) if now - a.last_try <= self.window => a.count,
            _ => 0,
        }
    }

    pub fn tries_used(&self, key: &str) -> u32 {
        let now = self.clock.now();
        self.live_count(self.visits().get(key), now)
    }

    pub fn remaining(&self, key: &str) -> u32 {
        self.max_attempts.saturating_sub(self.tries_used(key))
    }

    /// Record an attempt at the injected clock's time.
    pub fn admit(&self, key: &str) -> Result<DemoQuota, RateLimitError> {
        match self.record_attempt(key, self.clock.now()) {
            Ok(tries_used) => Ok(DemoQuota {
                tries_used,
                remaining: self.max_attempts.saturating_sub(tries_used),
            }),
            Err(tries_used) => Err(RateLimitError::LimitReached { tries_used }),
        }
    }

    /// Count after an admitted attempt, or the count that caused the refusal.
    /// Expired entries are dropped first, so an expired key starts over.
    fn record_attempt(&self, key: &str, now: DateTime<Utc>) -> Result<u32, u32> {
        let mut visits = self.visits();
        let window = self.window;
        visits.retain(|_, a| now - a.last_try <= window);

        let Some(attempts) = visits.get_mut(key) else {
            if self.max_attempts == 0 {
                return Err(0);
            }
            visits.insert(key.to_string(), Attempts { count: 1, last_try: now });
            debug!("[RATE_LIMIT] first demo attempt for {} in window", key);
            return Ok(1);
        };

        if attempts.count >= self.max_attempts {
            info!("[RATE_LIMIT] demo limit reached for {} ({} attempts)", key, attempts.count);
            return Err(attempts.count);
        }

        attempts.count += 1;
        attempts.last_try = now;
        Ok(attempts.count)
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.visits().len()
    }
}

impl RateLimiter for DemoRateLimiter {
    fn check(&self, key: &str, now: DateTime<Utc>) -> bool {
        self.record_attempt(key, now).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Clock that only moves when told to.
    #[derive(Debug)]
    struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn new(start: DateTime<Utc>) -> Self {
            Self { now: Mutex::new(start) }
        }

        fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap_or_else(|e| e.into_inner())
        }
    }

    fn limiter() -> (Arc<ManualClock>, DemoRateLimiter) {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()));
        let limiter = DemoRateLimiter::from_config(&DemoConfig::default(), clock.clone());
        (clock, limiter)
    }

    #[test]
    fn test_three_attempts_then_denied() {
        let (_clock, limiter) = limiter();
        assert_eq!(limiter.remaining("10.0.0.1"), 3);

        let first = limiter.admit("10.0.0.1").unwrap();
        assert_eq!(first, DemoQuota { tries_used: 1, remaining: 2 });
        limiter.admit("10.0.0.1").unwrap();
        let third = limiter.admit("10.0.0.1").unwrap();
        assert_eq!(third.remaining, 0);

        assert_eq!(
            limiter.admit("10.0.0.1"),
            Err(RateLimitError::LimitReached { tries_used: 3 })
        );
        assert_eq!(limiter.remaining("10.0.0.2"), 3);
    }

    #[test]
    fn test_window_expiry_resets_counter() {
        let (clock, limiter) = limiter();
        for _ in 0..3 {
            limiter.admit("client").unwrap();
        }
        clock.advance(Duration::hours(23));
        assert!(limiter.admit("client").is_err());

        clock.advance(Duration::hours(2));
        assert_eq!(limiter.tries_used("client"), 0);
        let quota = limiter.admit("client").unwrap();
        assert_eq!(quota.tries_used, 1);
        assert_eq!(quota.remaining, 2);
    }

    #[test]
    fn test_denied_attempts_do_not_extend_window() {
        let (clock, limiter) = limiter();
        for _ in 0..3 {
            limiter.admit("client").unwrap();
        }
        clock.advance(Duration::hours(20));
        assert!(limiter.admit("client").is_err());
        clock.advance(Duration::hours(5));
        assert!(limiter.admit("client").is_ok());
    }

    #[test]
    fn test_check_with_explicit_time() {
        let clock = Arc::new(SystemClock);
        let limiter = DemoRateLimiter::new(1, Duration::minutes(10), clock);
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

        assert!(limiter.check("k", t0));
        assert!(!limiter.check("k", t0 + Duration::minutes(5)));
        assert!(limiter.check("k", t0 + Duration::minutes(11)));
    }

    #[test]
    fn test_concurrent_admits_report_distinct_counts() {
        let (_clock, limiter) = limiter();
        let limiter = Arc::new(limiter);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                std::thread::spawn(move || limiter.admit("shared"))
            })
            .collect();

        let mut admitted: Vec<u32> = Vec::new();
        let mut refused = 0;
        for handle in handles {
            match handle.join().unwrap() {
                Ok(quota) => {
                    assert_eq!(quota.tries_used + quota.remaining, 3);
                    admitted.push(quota.tries_used);
                }
                Err(RateLimitError::LimitReached { tries_used }) => {
                    assert_eq!(tries_used, 3);
                    refused += 1;
                }
            }
        }
        admitted.sort_unstable();
        assert_eq!(admitted, vec![1, 2, 3]);
        assert_eq!(refused, 5);
    }

    #[test]
    fn test_expired_keys_are_pruned() {
        let (clock, limiter) = limiter();
        for i in 0..50 {
            limiter.admit(&format!("10.0.0.{i}")).unwrap();
        }
        assert_eq!(limiter.tracked_keys(), 50);

        clock.advance(Duration::hours(25));
        limiter.admit("10.0.1.1").unwrap();
        assert_eq!(limiter.tracked_keys(), 1);
    }

    #[test]
    fn test_zero_attempts_never_admits() {
        let (clock, _) = limiter();
        let limiter = DemoRateLimiter::new(0, Duration::hours(24), clock);
        assert!(limiter.admit("client").is_err());
        assert_eq!(limiter.remaining("client"), 0);
    }
}

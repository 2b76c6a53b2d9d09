//! Fixed-window rate limit bookkeeping.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

/// Request count for one caller address within its current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    pub window_expiry: DateTime<Utc>,
}

impl RateLimitEntry {
    /// A new window opened by the request arriving at `now`.
    ///
    /// Expiry saturates at the latest representable instant.
    pub fn open(now: DateTime<Utc>, window: Duration) -> Self {
        let window_expiry = TimeDelta::from_std(window)
            .ok()
            .and_then(|window| now.checked_add_signed(window))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            count: 1,
            window_expiry,
        }
    }

    /// Whether `now` still falls inside this window.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.window_expiry
    }

    /// Whether the sweep may drop this entry.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.window_expiry < now
    }

    /// Time left until the window closes, zero once it has.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.window_expiry - now).to_std().unwrap_or_default()
    }
}

/// Outcome of a rate limit check. Checks never fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Admitted { count: u32 },
    Limited { retry_after: Duration },
}

impl RateDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_boundaries() {
        let now = Utc::now();
        let entry = RateLimitEntry::open(now, Duration::from_secs(60));
        let expiry = entry.window_expiry;

        assert_eq!(entry.count, 1);
        assert!(entry.is_live(now));
        // At the exact expiry the window is closed but not yet swept.
        assert!(!entry.is_live(expiry));
        assert!(!entry.is_stale(expiry));
        assert!(entry.is_stale(expiry + chrono::Duration::milliseconds(1)));
    }

    #[test]
    fn test_oversized_window_saturates() {
        let now = Utc::now();
        let entry = RateLimitEntry::open(now, Duration::from_secs(u64::MAX / 2));

        assert_eq!(entry.window_expiry, DateTime::<Utc>::MAX_UTC);
        assert!(entry.is_live(now));
        assert!(entry.remaining(now) > Duration::ZERO);
    }

    #[test]
    fn test_remaining_saturates_at_zero() {
        let now = Utc::now();
        let entry = RateLimitEntry::open(now, Duration::from_secs(60));
        assert_eq!(entry.remaining(now), Duration::from_secs(60));
        assert_eq!(
            entry.remaining(now + chrono::Duration::seconds(120)),
            Duration::ZERO
        );
    }
}

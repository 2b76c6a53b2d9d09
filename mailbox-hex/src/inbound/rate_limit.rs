//! Per-address fixed-window rate limiting.
//!
//! Best effort and single-process: every instance keeps its own counters, so
//! running N instances multiplies the effective limit by N.

use std::{sync::Arc, time::Duration};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::{DashMap, mapref::entry::Entry};

use mailbox_types::{AppError, Clock, RateDecision, RateLimitEntry, SystemClock};

use super::handlers::ApiError;

/// Address used when no forwarded address is present.
pub const LOOPBACK_ADDRESS: &str = "127.0.0.1";

/// Fixed-window request counter keyed by caller address.
pub struct FixedWindowLimiter {
    entries: DashMap<String, RateLimitEntry>,
    max_requests: u32,
    window: Duration,
    clock: Arc<dyn Clock>,
}

impl Default for FixedWindowLimiter {
    fn default() -> Self {
        Self::new(10, Duration::from_secs(60))
    }
}

impl FixedWindowLimiter {
    /// Creates a limiter admitting `max_requests` per address per `window`.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_requests,
            window,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Records a request from `key` and decides whether to admit it.
    ///
    /// A rejected request does not bump the counter. Entries whose window has
    /// passed are swept on every call.
    pub fn check(&self, key: &str) -> RateDecision {
        let now = self.clock.now();

        // The entry guard holds a shard lock; it must be released before the sweep.
        let decision = match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if !entry.is_live(now) {
                    *entry = RateLimitEntry::open(now, self.window);
                    RateDecision::Admitted { count: 1 }
                } else if entry.count + 1 > self.max_requests {
                    RateDecision::Limited {
                        retry_after: entry.remaining(now),
                    }
                } else {
                    entry.count += 1;
                    RateDecision::Admitted { count: entry.count }
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(RateLimitEntry::open(now, self.window));
                RateDecision::Admitted { count: 1 }
            }
        };

        self.entries.retain(|_, entry| !entry.is_stale(now));
        decision
    }

    /// Current window state for `key`.
    pub fn entry(&self, key: &str) -> Option<RateLimitEntry> {
        self.entries.get(key).map(|e| *e)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops all counters.
    pub fn reset(&self) {
        self.entries.clear();
    }
}

/// Caller address: first `X-Forwarded-For` hop, else loopback.
///
/// Non-ASCII bytes are decoded lossily so such callers keep their own key.
pub fn client_address(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("X-Forwarded-For")
        .map(|v| String::from_utf8_lossy(v.as_bytes()));

    forwarded
        .as_deref()
        .and_then(|forwarded| forwarded.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or(LOOPBACK_ADDRESS)
        .to_string()
}

/// Rate limiting middleware. Runs before authentication.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<FixedWindowLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let address = client_address(request.headers());

    match limiter.check(&address) {
        RateDecision::Admitted { count } => {
            tracing::trace!(%address, count, "Request admitted");
            next.run(request).await
        }
        RateDecision::Limited { retry_after } => {
            tracing::warn!(%address, "Rate limit exceeded");
            let retry_after_secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            ApiError(AppError::RateLimited { retry_after_secs }).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::{TimeZone, Utc};
    use mailbox_types::ManualClock;

    fn limiter(max: u32) -> (FixedWindowLimiter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));
        let limiter =
            FixedWindowLimiter::new(max, Duration::from_secs(60)).with_clock(clock.clone());
        (limiter, clock)
    }

    #[test]
    fn test_tenth_admitted_eleventh_rejected() {
        let (limiter, _clock) = limiter(10);

        for i in 1..=10 {
            assert_eq!(
                limiter.check("10.0.0.1"),
                RateDecision::Admitted { count: i },
                "request {} should be admitted",
                i
            );
        }
        assert!(!limiter.check("10.0.0.1").is_admitted());
    }

    #[test]
    fn test_rejection_does_not_bump_count() {
        let (limiter, _clock) = limiter(2);
        limiter.check("a");
        limiter.check("a");

        for _ in 0..5 {
            assert!(!limiter.check("a").is_admitted());
        }
        assert_eq!(limiter.entry("a").unwrap().count, 2);
    }

    #[test]
    fn test_rejection_reports_time_left_in_window() {
        let (limiter, clock) = limiter(1);
        limiter.check("a");
        clock.advance(chrono::Duration::seconds(45));

        assert_eq!(
            limiter.check("a"),
            RateDecision::Limited {
                retry_after: Duration::from_secs(15)
            }
        );
    }

    #[test]
    fn test_window_resets_after_expiry() {
        let (limiter, clock) = limiter(3);
        for _ in 0..3 {
            limiter.check("a");
        }
        assert!(!limiter.check("a").is_admitted());

        clock.advance(chrono::Duration::seconds(60) + chrono::Duration::milliseconds(1));
        assert_eq!(limiter.check("a"), RateDecision::Admitted { count: 1 });

        let entry = limiter.entry("a").unwrap();
        assert_eq!(entry.window_expiry, clock.now() + chrono::Duration::seconds(60));
    }

    #[test]
    fn test_window_is_closed_at_exact_expiry() {
        let (limiter, clock) = limiter(1);
        limiter.check("a");
        clock.advance(chrono::Duration::seconds(60));

        assert_eq!(limiter.check("a"), RateDecision::Admitted { count: 1 });
    }

    #[test]
    fn test_oversized_window_does_not_panic() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_secs(u64::MAX / 2));
        assert!(limiter.check("a").is_admitted());

        match limiter.check("a") {
            RateDecision::Limited { retry_after } => assert!(retry_after > Duration::ZERO),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_addresses_are_isolated() {
        let (limiter, _clock) = limiter(1);
        assert!(limiter.check("a").is_admitted());
        assert!(!limiter.check("a").is_admitted());
        assert!(limiter.check("b").is_admitted());
    }

    #[test]
    fn test_expired_entries_are_swept() {
        let (limiter, clock) = limiter(5);
        limiter.check("a");
        limiter.check("b");
        assert_eq!(limiter.len(), 2);

        clock.advance(chrono::Duration::seconds(61));
        limiter.check("c");

        assert_eq!(limiter.len(), 1);
        assert!(limiter.entry("a").is_none());
        assert!(limiter.entry("c").is_some());
    }

    #[test]
    fn test_reset_clears_state() {
        let (limiter, _clock) = limiter(1);
        limiter.check("a");
        limiter.reset();
        assert!(limiter.is_empty());
        assert!(limiter.check("a").is_admitted());
    }

    #[test]
    fn test_client_address_uses_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Forwarded-For", "203.0.113.7, 10.0.0.1".parse().unwrap());
        assert_eq!(client_address(&headers), "203.0.113.7");
    }

    #[test]
    fn test_client_address_keeps_non_ascii_hops_apart() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Forwarded-For",
            HeaderValue::from_bytes(b"203.0.113.\xff, 10.0.0.1").unwrap(),
        );
        let address = client_address(&headers);
        assert_ne!(address, LOOPBACK_ADDRESS);
        assert!(address.starts_with("203.0.113."));

        let mut other = HeaderMap::new();
        other.insert(
            "X-Forwarded-For",
            HeaderValue::from_bytes(b"198.51.100.\xfe").unwrap(),
        );
        assert_ne!(client_address(&other), LOOPBACK_ADDRESS);
    }

    #[test]
    fn test_client_address_defaults_to_loopback() {
        assert_eq!(client_address(&HeaderMap::new()), LOOPBACK_ADDRESS);

        let mut headers = HeaderMap::new();
        headers.insert("X-Forwarded-For", "".parse().unwrap());
        assert_eq!(client_address(&headers), LOOPBACK_ADDRESS);
    }
}

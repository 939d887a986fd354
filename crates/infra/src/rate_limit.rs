//! Fixed-window rate limiting for abuse-prone endpoints.
//!
//! State is process-local and not shared across instances; boundary bursts
//! are possible. That is adequate for deterring abuse of unauthenticated
//! endpoints, not for billing-grade quotas.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Decision for one call against one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Requests left in the current window (0 when denied).
    pub remaining: u32,
    /// Seconds until the window resets; 0 when allowed.
    pub retry_after_seconds: u64,
}

#[derive(Debug)]
struct RateLimitEntry {
    count: u32,
    window_reset_at: Instant,
}

/// Fixed-window request counter keyed by string.
///
/// Constructed once at startup and injected into handlers; entries are
/// created lazily and overwritten on window rollover.
#[derive(Debug, Default)]
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one request against `key`.
    ///
    /// The map's entry guard serializes the read-check-increment for a key:
    /// concurrent callers never lose an increment or obtain more than
    /// `limit` successes within one window.
    pub fn check(&self, key: &str, limit: u32, window: Duration) -> RateLimitDecision {
        let now = Instant::now();
        let mut entry = self
            .entries
            .entry(key.to_owned())
            .or_insert(RateLimitEntry {
                count: 0,
                window_reset_at: now + window,
            });

        if entry.count == 0 || now >= entry.window_reset_at {
            *entry = RateLimitEntry {
                count: 1,
                window_reset_at: now + window,
            };
            return RateLimitDecision {
                allowed: true,
                remaining: limit.saturating_sub(1),
                retry_after_seconds: 0,
            };
        }

        if entry.count >= limit {
            let wait = entry.window_reset_at.saturating_duration_since(now);
            return RateLimitDecision {
                allowed: false,
                remaining: 0,
                retry_after_seconds: (wait.as_millis() as u64).div_ceil(1000),
            };
        }

        entry.count += 1;
        RateLimitDecision {
            allowed: true,
            remaining: limit - entry.count,
            retry_after_seconds: 0,
        }
    }

    /// Drop entries whose window closed more than `grace` ago.
    ///
    /// Keys can be high-cardinality (normalized emails, client addresses);
    /// without eviction the map grows without bound.
    pub fn sweep_expired(&self, grace: Duration) {
        let now = Instant::now();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.window_reset_at) <= grace);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Spawn the periodic sweep for stale entries.
pub fn start_sweep_task(
    limiter: Arc<RateLimiter>,
    every: Duration,
    grace: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            limiter.sweep_expired(grace);
            tracing::debug!(entries = limiter.len(), "swept rate limit entries");
        }
    })
}

// Per-client sliding-window rate limiter.
//
// The ledger maps a client identifier (originating address) to the
// timestamps of its admitted submissions. On every check the history is
// pruned to the trailing window, then the call is admitted only if a slot
// remains. Denials do not consume a slot.
//
// The prune-check-append sequence for an identifier must be atomic — two
// racing calls must never both see the same pre-append count and both get
// admitted past the limit. A single mutex over the whole ledger is enough
// here; contention is one short critical section per submission.
//
// State lives for the process lifetime only. Restarting the server resets
// all histories.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

/// Default window: 1 hour.
pub const DEFAULT_WINDOW_SECS: i64 = 3600;
/// Default cap: 3 admitted submissions per identifier per window.
pub const DEFAULT_MAX_COUNT: usize = 3;

/// Bounds how often a single client may submit within a trailing window.
pub struct SlidingWindowLimiter {
    window: Duration,
    max_count: usize,
    ledger: Mutex<HashMap<String, Vec<DateTime<Utc>>>>,
}

impl Default for SlidingWindowLimiter {
    fn default() -> Self {
        Self::per_hour(DEFAULT_MAX_COUNT)
    }
}

impl SlidingWindowLimiter {
    pub fn new(window: Duration, max_count: usize) -> Self {
        Self {
            window,
            max_count,
            ledger: Mutex::new(HashMap::new()),
        }
    }

    /// Limiter with the default 3-per-hour policy.
    pub fn per_hour(max_count: usize) -> Self {
        Self::new(Duration::seconds(DEFAULT_WINDOW_SECS), max_count)
    }

    /// Check whether `identifier` may submit at `now`, recording the
    /// submission if admitted. Returns true on admission.
    ///
    /// `now` is passed in rather than read from the clock so callers and
    /// tests control time.
    pub fn check_and_record(&self, identifier: &str, now: DateTime<Utc>) -> bool {
        let mut ledger = self
            .ledger
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let history = ledger.entry(identifier.to_string()).or_default();

        // Prune entries that have fallen out of the window. Strictly
        // greater: an entry exactly `window` old no longer counts.
        let cutoff = now - self.window;
        history.retain(|ts| *ts > cutoff);

        if history.len() >= self.max_count {
            return false;
        }
        history.push(now);
        true
    }
}

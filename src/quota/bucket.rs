//! Quota Bucket Module
//!
//! A single fixed-window counter with lazy reset.

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

// == Quota Decision ==
/// Outcome of an acquisition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    /// The call was admitted and charged to the bucket
    Allowed,
    /// The budget is spent; the window ends in this many seconds (at least 1)
    Denied { seconds_remaining: u64 },
}

impl QuotaDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, QuotaDecision::Allowed)
    }
}

// == Quota Snapshot ==
/// Read-only view of a bucket for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaSnapshot {
    /// Calls charged in the current window
    pub count: u32,
    /// Calls allowed per window
    pub limit: u32,
    /// Calls still available in the current window
    pub remaining: u32,
    /// Seconds until the current window ends, 0 when idle
    pub remaining_seconds: u64,
}

// == Quota Bucket ==
/// Fixed-window counter for one upstream source class.
///
/// The bucket is idle until its first call; that call opens a window of
/// `window` length. A window that has fully elapsed is reset by the next
/// acquisition attempt rather than by a timer.
#[derive(Debug, Clone)]
pub struct QuotaBucket {
    count: u32,
    limit: u32,
    window: Duration,
    window_start: Option<Instant>,
}

impl QuotaBucket {
    // == Constructor ==
    /// Creates an idle bucket.
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            count: 0,
            limit,
            window,
            window_start: None,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    // == Try Acquire ==
    /// Charges one call if the budget allows it.
    ///
    /// Resets an idle or expired window first. A denial leaves `count`
    /// untouched.
    pub fn try_acquire(&mut self, now: Instant) -> QuotaDecision {
        if self.active_window_start(now).is_none() {
            self.count = 0;
            self.window_start = Some(now);
        }

        if self.count < self.limit {
            self.count += 1;
            return QuotaDecision::Allowed;
        }

        QuotaDecision::Denied {
            seconds_remaining: self.seconds_remaining(now).max(1),
        }
    }

    // == Snapshot ==
    /// Returns the bucket as it would be seen by the next call, without mutating it.
    pub fn snapshot(&self, now: Instant) -> QuotaSnapshot {
        let count = match self.active_window_start(now) {
            Some(_) => self.count,
            None => 0,
        };

        QuotaSnapshot {
            count,
            limit: self.limit,
            remaining: self.limit.saturating_sub(count),
            remaining_seconds: self.seconds_remaining(now),
        }
    }

    /// Start of the current window, or None when idle or expired.
    fn active_window_start(&self, now: Instant) -> Option<Instant> {
        self.window_start
            .filter(|start| now.saturating_duration_since(*start) < self.window)
    }

    /// Whole seconds until the current window ends, rounded up.
    fn seconds_remaining(&self, now: Instant) -> u64 {
        match self.active_window_start(now) {
            Some(start) => {
                let left = (start + self.window).saturating_duration_since(now);
                left.as_secs() + u64::from(left.subsec_nanos() > 0)
            }
            None => 0,
        }
    }
}

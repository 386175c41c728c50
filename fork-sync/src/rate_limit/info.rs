//! Core rate limit snapshot.

/// Requests left before the platform starts rejecting calls.
const MIN_REMAINING_THRESHOLD: u32 = 5;

/// Core REST quota as reported by the rate limit endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub remaining: u32,

    /// Unix timestamp when the window resets.
    pub reset: u64,

    pub limit: u32,
}

impl RateLimitInfo {
    /// Whether fewer than the safety margin of requests remain.
    #[must_use]
    pub fn is_nearly_exhausted(&self) -> bool {
        self.remaining < MIN_REMAINING_THRESHOLD
    }

    /// Seconds to sleep at `now` before the next call, if any.
    #[must_use]
    pub fn wait_secs(&self, now: u64) -> Option<u64> {
        if !self.is_nearly_exhausted() || self.reset <= now {
            return None;
        }
        Some(self.reset - now)
    }
}

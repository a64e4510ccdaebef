//! Reconnect delay schedule.

use std::time::Duration;

/// Delays in milliseconds before each reconnect attempt.
pub const DEFAULT_RETRY_DELAYS_MS: [u64; 6] = [0, 1500, 3000, 5000, 10000, 15000];

/// Fixed, clamped schedule of waits between connect attempts.
///
/// After the n-th consecutive failure the client waits
/// `delays[min(n - 1, len - 1)]` before trying again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrySchedule {
    delays: Vec<Duration>,
}

impl RetrySchedule {
    /// An empty list falls back to retrying immediately.
    pub fn new(delays: Vec<Duration>) -> Self {
        if delays.is_empty() {
            return Self {
                delays: vec![Duration::ZERO],
            };
        }
        Self { delays }
    }

    pub fn from_millis(delays_ms: &[u64]) -> Self {
        Self::new(delays_ms.iter().copied().map(Duration::from_millis).collect())
    }

    /// Wait after `failures` consecutive failed attempts.
    pub fn delay_for(&self, failures: u32) -> Duration {
        if failures == 0 {
            return Duration::ZERO;
        }
        let index = (failures as usize - 1).min(self.delays.len() - 1);
        self.delays[index]
    }

    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }
}

impl Default for RetrySchedule {
    fn default() -> Self {
        Self::from_millis(&DEFAULT_RETRY_DELAYS_MS)
    }
}

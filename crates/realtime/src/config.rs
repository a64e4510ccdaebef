use std::time::Duration;

use crate::backoff::RetrySchedule;

pub const DEFAULT_COALESCE_WINDOW_MS: u64 = 200;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 45;
/// Twice the hub's keep-alive interval.
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 30;

/// Settings for [`crate::RealtimeClient`].
#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    pub retry: RetrySchedule,
    /// Capacity of the change event fan-out to local subscribers.
    pub change_buffer: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            retry: RetrySchedule::default(),
            change_buffer: 64,
        }
    }
}

/// Settings for [`crate::GroceryListSync`].
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Events inside one window collapse into a single reload.
    pub coalesce_window: Duration,
    /// Fallback reload period, independent of event traffic.
    pub poll_interval: Duration,
    pub notice_buffer: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            coalesce_window: Duration::from_millis(DEFAULT_COALESCE_WINDOW_MS),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            notice_buffer: 16,
        }
    }
}

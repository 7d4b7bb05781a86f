//! Refresh tick for the active page

/// Refresh period used when none is configured
pub const DEFAULT_REFRESH_INTERVAL_MS: u32 = 1000;

/// Interval timer driving `Page::refresh`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefreshScheduler {
    interval_ms: u32,
    last_fired_ms: u32,
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_INTERVAL_MS)
    }
}

impl RefreshScheduler {
    /// Create a scheduler that last fired at time zero
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_fired_ms: 0,
        }
    }

    pub const fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub const fn last_fired_ms(&self) -> u32 {
        self.last_fired_ms
    }

    /// More than one interval has passed since the last tick
    pub fn is_due(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.last_fired_ms) > self.interval_ms
    }

    /// Consume a tick if one is due
    ///
    /// Returns `true` and restarts the interval at `now_ms` when due.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if !self.is_due(now_ms) {
            return false;
        }
        self.last_fired_ms = now_ms;
        true
    }

    /// Restart the interval at `now_ms`
    pub fn reset(&mut self, now_ms: u32) {
        self.last_fired_ms = now_ms;
    }
}

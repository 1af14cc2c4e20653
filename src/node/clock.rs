//! Wrapping millisecond ticks and the fixed-period report timer.

/// Adds `delta` milliseconds to a tick value, wrapping at `u32::MAX`.
pub fn ticks_add(ticks: u32, delta: u32) -> u32 {
    ticks.wrapping_add(delta)
}

/// Signed distance from `earlier` to `later`, valid across one wrap.
///
/// Positive when `later` is ahead of `earlier`.
pub fn ticks_diff(later: u32, earlier: u32) -> i32 {
    later.wrapping_sub(earlier) as i32
}

/// A fixed-period deadline timer.
///
/// The deadline advances by exactly one interval per expiry, so jitter in
/// when the loop polls never accumulates into drift.
///
/// # Examples
///
/// ```
/// use house_node::node::clock::ReportTimer;
///
/// let mut timer = ReportTimer::new(1000, 0);
/// assert!(!timer.poll(999));
/// assert!(timer.poll(1004));
/// assert_eq!(timer.deadline(), 2000);
/// ```
#[derive(Debug, Clone)]
pub struct ReportTimer {
    /// Period in milliseconds
    interval_ms: u32,
    /// Tick at which the next report is due
    deadline: u32,
}

impl ReportTimer {
    /// Creates a timer whose first deadline is one interval after `now`.
    ///
    /// # Panics
    ///
    /// Panics if `interval_ms` is zero or does not fit a signed tick diff.
    pub fn new(interval_ms: u32, now: u32) -> Self {
        assert!(interval_ms > 0, "interval_ms must be > 0");
        assert!(interval_ms <= i32::MAX as u32);
        Self {
            interval_ms,
            deadline: ticks_add(now, interval_ms),
        }
    }

    /// Returns `true` once per elapsed interval and advances the deadline.
    pub fn poll(&mut self, now: u32) -> bool {
        if ticks_diff(now, self.deadline) >= 0 {
            self.deadline = ticks_add(self.deadline, self.interval_ms);
            true
        } else {
            false
        }
    }

    /// Milliseconds until the next deadline, zero if already due.
    pub fn remaining_ms(&self, now: u32) -> u32 {
        ticks_diff(self.deadline, now).max(0) as u32
    }

    /// Tick of the next deadline.
    pub fn deadline(&self) -> u32 {
        self.deadline
    }

    /// Report period in milliseconds.
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }
}

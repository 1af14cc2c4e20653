//! Wall-clock tick source.

use std::thread;
use std::time::{Duration, Instant};

use crate::hal::TickSource;

/// Milliseconds since construction, wrapping like a hardware tick counter.
#[derive(Debug)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for SystemClock {
    fn now_ms(&mut self) -> u32 {
        // Truncation is the wrap.
        self.start.elapsed().as_millis() as u32
    }

    fn sleep_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

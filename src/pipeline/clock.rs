//! Frame clocks

use std::time::Instant;

use crate::gesture::TimestampMs;

/// Source of frame timestamps for detections that arrive unstamped.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> TimestampMs;
}

/// Milliseconds elapsed since the clock was created.
#[derive(Debug, Clone, Copy)]
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

impl Clock for SystemClock {
    fn now_ms(&self) -> TimestampMs {
        self.start.elapsed().as_millis() as TimestampMs
    }
}

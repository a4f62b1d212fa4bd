use parking_lot::Mutex;
use std::thread;
use std::time::{Duration, Instant};

/// Enforces a minimum spacing between consecutive geocoder calls.
///
/// The timestamp is read and updated under one lock held across the wait, so
/// concurrent callers serialize: no two of them can observe the same "last
/// slot" and both proceed early. A zero interval disables the limiter
/// entirely and never blocks.
pub struct RateLimiter {
    interval: Duration,
    last_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_slot: Mutex::new(None),
        }
    }

    /// Block until the interval since the last granted slot has elapsed,
    /// then claim the next slot.
    pub fn await_slot(&self) {
        if self.interval.is_zero() {
            return;
        }
        let mut last_slot = self.last_slot.lock();
        if let Some(previous) = *last_slot {
            let elapsed = previous.elapsed();
            if elapsed < self.interval {
                thread::sleep(self.interval - elapsed);
            }
        }
        *last_slot = Some(Instant::now());
    }
}

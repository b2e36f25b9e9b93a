//! Clock abstraction used to time backend calls.

use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of monotonic time.
///
/// The simulation service measures the wall-clock duration of a run through
/// this trait so tests can substitute a `ManualClock` and assert exact
/// runtimes.
pub trait Clock: Send + Sync + 'static {
    /// Returns the time elapsed since the clock was created.
    fn now(&self) -> Duration;
}

/// Production clock backed by `std::time::Instant`.
pub struct SystemClock {
    /// Start time for monotonic duration calculations
    start: Instant,
}

impl SystemClock {
    /// Creates a new SystemClock.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Creates an Arc-wrapped clock for sharing across services.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_system_clock_advances() {
        let clock = SystemClock::new();
        let t1 = clock.now();
        tokio::time::sleep(Duration::from_millis(10)).await;
        let t2 = clock.now();

        assert!(t2 > t1);
        assert!(t2 - t1 >= Duration::from_millis(10));
    }
}

//! Time sources for sample timestamps and elapsed-time tracking

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant, SystemTime};

/// A source of "now", measured from the Unix epoch.
///
/// Implementations must never go backwards.
pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;
}

/// Wall-clock time anchored once at construction and advanced by a
/// monotonic [`Instant`], so NTP adjustments cannot reorder samples.
#[derive(Debug, Clone)]
pub struct SystemClock {
    epoch_offset: Duration,
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            epoch_offset: SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .unwrap_or_default(),
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch_offset + self.origin.elapsed()
    }
}

/// Manually advanced clock for tests and replays
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Duration) -> Self {
        Self {
            nanos: AtomicU64::new(start.as_nanos() as u64),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Move the clock to `to`; earlier values are ignored
    pub fn set(&self, to: Duration) {
        self.nanos.fetch_max(to.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::default();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
        assert!(a > Duration::from_secs(1_600_000_000));
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(Duration::from_secs(100));
        clock.advance(Duration::from_millis(250));
        assert_eq!(clock.now(), Duration::from_millis(100_250));

        clock.set(Duration::from_secs(50));
        assert_eq!(clock.now(), Duration::from_millis(100_250));
    }
}

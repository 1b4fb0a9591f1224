//! Monotonic time source (§2 "Time source", §6 "Monotonic clock").
//!
//! The scheduler's deadline arithmetic is defined entirely in terms of a
//! microsecond monotonic counter that "never decreases" — it deliberately
//! does not use `chrono`'s wall-clock `DateTime<Utc>` (reserved for
//! supervisor/monitoring metadata, see DESIGN.md), matching the "no wall
//! -clock timing" non-goal on the scheduling hot path.

// Layer 1: Standard library imports
use std::time::Instant;

/// Microseconds since an arbitrary epoch fixed at clock construction.
/// Guaranteed non-decreasing across successive calls to [`Clock::now_us`].
pub type MicroTimestamp = u64;

/// Platform adapter contract for the monotonic clock (§6).
pub trait Clock: Send + Sync {
    /// Microseconds elapsed since the clock was created. Never decreases.
    fn now_us(&self) -> MicroTimestamp;
}

/// Default [`Clock`] backed by `std::time::Instant`.
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_us(&self) -> MicroTimestamp {
        self.origin.elapsed().as_micros() as u64
    }
}

/// Deterministic [`Clock`] for tests: advances only when told to.
#[cfg(any(test, feature = "test-util"))]
pub struct TestClock {
    now: std::sync::atomic::AtomicU64,
}

#[cfg(any(test, feature = "test-util"))]
impl TestClock {
    pub fn new() -> Self {
        Self {
            now: std::sync::atomic::AtomicU64::new(0),
        }
    }

    pub fn advance(&self, delta_us: u64) {
        self.now
            .fetch_add(delta_us, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Clock for TestClock {
    fn now_us(&self) -> MicroTimestamp {
        self.now.load(std::sync::atomic::Ordering::SeqCst)
    }
}

/// Lets a test keep an `Arc` handle to advance the clock after handing
/// ownership of a `Box<dyn Clock>` into the engine.
#[cfg(any(test, feature = "test-util"))]
impl Clock for std::sync::Arc<TestClock> {
    fn now_us(&self) -> MicroTimestamp {
        TestClock::now_us(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_clock_never_decreases() {
        let clock = MonotonicClock::new();
        let a = clock.now_us();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let b = clock.now_us();
        assert!(b >= a);
    }

    #[test]
    fn test_clock_advances_deterministically() {
        let clock = TestClock::new();
        assert_eq!(clock.now_us(), 0);
        clock.advance(1_000);
        assert_eq!(clock.now_us(), 1_000);
    }
}

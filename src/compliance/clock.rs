//! Clock abstraction for deadline arithmetic.
//!
//! All SLA and counter-notice math depends on "now". Injecting the clock lets
//! tests freeze or advance time deterministically instead of relying on
//! wall-clock tolerance windows.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// Source of the current time for deadline computation
pub trait Clock: Send + Sync {
    /// Current instant in UTC
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Frozen clock for tests
///
/// Returns a fixed instant until explicitly advanced.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Create a clock frozen at the given instant
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    /// Move the clock forward
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock();
        *now = *now + delta;
    }

    /// Reposition the clock at an exact instant
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock() = instant;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

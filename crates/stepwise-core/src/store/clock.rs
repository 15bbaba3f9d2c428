//! Time sources for stamping plan transitions.

use std::{
    fmt,
    sync::atomic::{AtomicI64, Ordering},
};

use jiff::{SignedDuration, Timestamp};

/// Source of "now" for the plan store.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current instant.
    fn now(&self) -> Timestamp;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

/// Starts at a fixed instant and advances by a fixed step on every read.
///
/// Gives each transition a distinct, predictable timestamp.
#[derive(Debug)]
pub struct TickingClock {
    start: Timestamp,
    step: SignedDuration,
    ticks: AtomicI64,
}

impl TickingClock {
    /// Creates a clock that advances one second per read.
    pub fn new(start: Timestamp) -> Self {
        Self::with_step(start, SignedDuration::from_secs(1))
    }

    /// Creates a clock that advances by `step` per read.
    pub fn with_step(start: Timestamp, step: SignedDuration) -> Self {
        Self {
            start,
            step,
            ticks: AtomicI64::new(0),
        }
    }
}

impl Clock for TickingClock {
    fn now(&self) -> Timestamp {
        let ticks = self.ticks.fetch_add(1, Ordering::Relaxed);
        let offset = i32::try_from(ticks)
            .ok()
            .and_then(|ticks| self.step.checked_mul(ticks))
            .unwrap_or(SignedDuration::MAX);
        self.start.checked_add(offset).unwrap_or(Timestamp::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_is_stable() {
        let clock = FixedClock(Timestamp::UNIX_EPOCH);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_ticking_clock_advances() {
        let start = Timestamp::from_second(1_700_000_000).unwrap();
        let clock = TickingClock::new(start);

        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), Timestamp::from_second(1_700_000_001).unwrap());
        assert_eq!(clock.now(), Timestamp::from_second(1_700_000_002).unwrap());
    }
}

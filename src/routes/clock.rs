//! Time sources and cooperative deadlines.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A monotonic time source.
///
/// Readings are offsets from an arbitrary, fixed origin.
pub trait Clock: Send + Sync {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Creates a clock whose origin is now.
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
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock that only moves when told to.
///
/// With a step, every reading also advances the clock by that step, which
/// lets tests run past a deadline without waiting.
///
/// # Example
///
/// ```
/// use centerline::routes::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::stepping(Duration::from_millis(10));
/// assert_eq!(clock.now(), Duration::ZERO);
/// assert_eq!(clock.now(), Duration::from_millis(10));
///
/// clock.advance(Duration::from_secs(1));
/// assert_eq!(clock.now(), Duration::from_millis(1020));
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
    step: u64,
}

impl ManualClock {
    /// Creates a clock frozen at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock that advances by `step` after every reading.
    pub fn stepping(step: Duration) -> Self {
        Self {
            nanos: AtomicU64::new(0),
            step: duration_nanos(step),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(duration_nanos(by), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.fetch_add(self.step, Ordering::SeqCst))
    }
}

fn duration_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

/// A time budget measured against a [`Clock`].
#[derive(Debug)]
pub struct Deadline<'a, C: ?Sized> {
    clock: &'a C,
    start: Duration,
    budget: Duration,
}

impl<'a, C: Clock + ?Sized> Deadline<'a, C> {
    /// Starts a deadline `budget` from the clock's current reading.
    pub fn start(clock: &'a C, budget: Duration) -> Self {
        Self {
            clock,
            start: clock.now(),
            budget,
        }
    }

    /// The total budget.
    #[inline]
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time spent since the deadline started.
    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_sub(self.start)
    }

    /// True once strictly more than the budget has elapsed.
    pub fn exceeded(&self) -> bool {
        self.elapsed() > self.budget
    }
}

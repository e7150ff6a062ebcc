//! Free-running tick counter shared between the tick interrupt and the
//! event loop.
//!
//! One tick is the system time quantum. The counter is 16 bits wide and
//! wraps; every consumer only ever asks for small positive differences, so
//! wrapping subtraction yields the right answer across the wrap point.

use core::fmt;

use portable_atomic::{AtomicU16, Ordering};

/// Snapshot of the free-running tick counter.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Ticks(u16);

impl Ticks {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Ticks elapsed since `mark`, tolerating a single counter wrap.
    #[must_use]
    pub const fn wrapping_since(self, mark: Ticks) -> u16 {
        self.0.wrapping_sub(mark.0)
    }

    /// Counter value advanced by `count` ticks.
    #[must_use]
    pub const fn wrapping_add(self, count: u16) -> Self {
        Self(self.0.wrapping_add(count))
    }

    /// Returns `true` when the raw counter is an exact multiple of `divisor`.
    ///
    /// A zero divisor never matches.
    #[must_use]
    pub const fn is_multiple_of(self, divisor: u16) -> bool {
        divisor != 0 && self.0 % divisor == 0
    }
}

impl fmt::Display for Ticks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Tick counter plus the counter value the event loop last acknowledged.
///
/// A tick is pending while the two differ, so acknowledging an older
/// observation never hides a tick that arrived after it.
pub struct Timebase {
    counter: AtomicU16,
    acknowledged: AtomicU16,
}

impl Timebase {
    #[must_use]
    pub const fn new() -> Self {
        Self::starting_at(Ticks::ZERO)
    }

    /// Creates a timebase whose counter starts at `start` instead of zero.
    #[must_use]
    pub const fn starting_at(start: Ticks) -> Self {
        Self {
            counter: AtomicU16::new(start.0),
            acknowledged: AtomicU16::new(start.0),
        }
    }

    /// Called once per tick period from interrupt (or tick task) context.
    pub fn on_tick(&self) {
        self.counter.fetch_add(1, Ordering::AcqRel);
    }

    /// Current value of the free-running counter.
    #[must_use]
    pub fn now(&self) -> Ticks {
        Ticks(self.counter.load(Ordering::Acquire))
    }

    /// Marks the start of an interval such as a button hold.
    #[must_use]
    pub fn snapshot(&self) -> Ticks {
        self.now()
    }

    #[must_use]
    pub fn elapsed_since(&self, mark: Ticks) -> u16 {
        self.now().wrapping_since(mark)
    }

    #[must_use]
    pub fn tick_pending(&self) -> bool {
        self.observe().1
    }

    /// Reads the counter once and reports whether it moved since the last
    /// acknowledged value.
    #[must_use]
    pub fn observe(&self) -> (Ticks, bool) {
        let now = self.now();
        let acknowledged = self.acknowledged.load(Ordering::Acquire);
        (now, now.0 != acknowledged)
    }

    /// Marks every tick up to and including `observed` as consumed. Ticks
    /// counted after `observed` stay pending.
    pub fn acknowledge_tick(&self, observed: Ticks) {
        self.acknowledged.store(observed.0, Ordering::Release);
    }
}

impl Default for Timebase {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_tick_advances_counter_and_raises_flag() {
        let timebase = Timebase::new();
        assert!(!timebase.tick_pending());

        timebase.on_tick();
        timebase.on_tick();

        assert_eq!(timebase.now(), Ticks::new(2));
        assert!(timebase.tick_pending());

        timebase.acknowledge_tick(timebase.now());
        assert!(!timebase.tick_pending());
        assert_eq!(timebase.now(), Ticks::new(2));
    }

    #[test]
    fn tick_after_observation_stays_pending() {
        let timebase = Timebase::new();
        timebase.on_tick();
        let (observed, pending) = timebase.observe();
        assert!(pending);

        timebase.on_tick();
        timebase.acknowledge_tick(observed);

        assert_eq!(timebase.observe(), (Ticks::new(2), true));
        timebase.acknowledge_tick(Ticks::new(2));
        assert!(!timebase.tick_pending());
    }

    #[test]
    fn elapsed_survives_counter_wrap() {
        let timebase = Timebase::starting_at(Ticks::new(u16::MAX - 1));
        let mark = timebase.snapshot();

        for _ in 0..4 {
            timebase.on_tick();
        }

        assert_eq!(timebase.now(), Ticks::new(2));
        assert_eq!(timebase.elapsed_since(mark), 4);
    }

    #[test]
    fn multiple_of_rejects_zero_divisor() {
        assert!(Ticks::new(10).is_multiple_of(5));
        assert!(!Ticks::new(11).is_multiple_of(5));
        assert!(!Ticks::new(10).is_multiple_of(0));
    }
}

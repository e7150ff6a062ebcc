//! LED bar progress indicator.
//!
//! While cooking, the eight-LED bar starts fully lit and loses one LED per
//! eighth of the cooking time, from the least significant end.

use crate::timebase::Ticks;

/// Every LED lit; shown when cooking starts.
pub const LED_ALL_ON: u8 = 0xFF;
/// Every LED dark.
pub const LED_ALL_OFF: u8 = 0x00;

/// LED bar collaborator: eight independent binary outputs.
pub trait LedBar {
    /// Drives all eight outputs at once. Must not reconfigure the pins.
    fn set_pattern(&mut self, bits: u8);

    /// Reads back the pattern currently driven.
    fn pattern(&self) -> u8;
}

impl<T: LedBar + ?Sized> LedBar for &mut T {
    fn set_pattern(&mut self, bits: u8) {
        (**self).set_pattern(bits);
    }

    fn pattern(&self) -> u8 {
        (**self).pattern()
    }
}

/// LED bar that only remembers the last pattern.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct LatchedLedBar {
    bits: u8,
}

impl LatchedLedBar {
    #[must_use]
    pub const fn new() -> Self {
        Self { bits: LED_ALL_OFF }
    }
}

impl LedBar for LatchedLedBar {
    fn set_pattern(&mut self, bits: u8) {
        self.bits = bits;
    }

    fn pattern(&self) -> u8 {
        self.bits
    }
}

/// Pattern for a given number of elapsed eighths.
#[must_use]
pub const fn pattern_for_eighths(eighths: u16) -> u8 {
    if eighths >= 8 {
        LED_ALL_OFF
    } else {
        LED_ALL_ON << eighths
    }
}

/// Progress state captured when cooking (re)starts.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ProgressIndicator {
    started_at: Ticks,
    flicker: u16,
}

impl ProgressIndicator {
    /// Snapshots the start tick and derives the per-eighth scale from the
    /// requested cooking time in seconds.
    #[must_use]
    pub const fn start(now: Ticks, time_remaining: u16) -> Self {
        Self {
            started_at: now,
            flicker: time_remaining.saturating_add(5) / 8,
        }
    }

    /// Keeps the scale but restarts elapsed time from `now`.
    #[must_use]
    pub const fn restarted_at(self, now: Ticks) -> Self {
        Self {
            started_at: now,
            flicker: self.flicker,
        }
    }

    #[must_use]
    pub const fn started_at(&self) -> Ticks {
        self.started_at
    }

    /// Seconds per eighth of the bar; zero for very short cooks.
    #[must_use]
    pub const fn flicker(&self) -> u16 {
        self.flicker
    }

    /// LED pattern for the tick `now`.
    ///
    /// Short cooks yield a zero scale; the divisor is clamped to one so
    /// they simply run through the eighths one per second.
    #[must_use]
    pub fn pattern_at(&self, now: Ticks, ticks_per_second: u16) -> u8 {
        let divisor = u32::from(self.flicker.max(1)) * u32::from(ticks_per_second.max(1));
        let elapsed = u32::from(now.wrapping_since(self.started_at));
        let eighths = u16::try_from(elapsed / divisor).unwrap_or(u16::MAX);
        pattern_for_eighths(eighths)
    }
}

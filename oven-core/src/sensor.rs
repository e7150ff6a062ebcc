//! Analog sensor conditioning.
//!
//! Raw ADC samples are collected into a fixed window. Each time the window
//! fills, its average is compared against the last reported value; only a
//! move of at least the edge threshold produces a [`StableReading`]. Smaller
//! changes are single-LSB jitter and are swallowed.

use crate::config::{SENSOR_WINDOW, SensorConfig};

/// Averaged, hysteresis-filtered sensor value.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct StableReading {
    /// Window average, rounded toward zero.
    pub average: u16,
    /// Average reduced to the 8-bit control range.
    pub scaled: u8,
}

impl StableReading {
    /// Builds a reading from a window average, saturating the scaled value
    /// when the input is wider than `8 + shift` bits.
    #[must_use]
    pub fn from_average(average: u16, shift: u8) -> Self {
        let shifted = average.checked_shr(u32::from(shift)).unwrap_or(0);
        Self {
            average,
            scaled: u8::try_from(shifted).unwrap_or(u8::MAX),
        }
    }
}

/// Sliding-window conditioner over `N` raw samples.
#[derive(Clone, Debug)]
pub struct SensorConditioner<const N: usize = SENSOR_WINDOW> {
    window: [u16; N],
    cursor: usize,
    last_stable: u16,
    config: SensorConfig,
}

impl<const N: usize> SensorConditioner<N> {
    #[must_use]
    pub const fn new(config: SensorConfig) -> Self {
        const { assert!(N > 0, "sensor window must hold at least one sample") };
        Self {
            window: [0; N],
            cursor: 0,
            last_stable: 0,
            config,
        }
    }

    /// Pushes one raw sample. Returns a reading only when this sample
    /// completed a window whose average moved past the edge threshold.
    pub fn on_sample(&mut self, raw: u16) -> Option<StableReading> {
        if let Some(slot) = self.window.get_mut(self.cursor) {
            *slot = raw;
        }
        self.cursor = (self.cursor + 1) % N;
        if self.cursor != 0 {
            return None;
        }

        let average = self.window_average();
        if average.abs_diff(self.last_stable) < self.config.edge_threshold {
            return None;
        }

        self.last_stable = average;
        Some(StableReading::from_average(average, self.config.scale_shift))
    }

    /// Write position for the next sample, always in `0..N`.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Average most recently reported, zero before the first report.
    #[must_use]
    pub const fn last_stable(&self) -> u16 {
        self.last_stable
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    fn window_average(&self) -> u16 {
        let sum: u32 = self.window.iter().copied().map(u32::from).sum();
        let count = u32::try_from(N).unwrap_or(u32::MAX);
        u16::try_from(sum / count).unwrap_or(u16::MAX)
    }
}

impl Default for SensorConditioner<SENSOR_WINDOW> {
    fn default() -> Self {
        Self::new(SensorConfig::default())
    }
}

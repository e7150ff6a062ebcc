//! Tunables shared by the controller, the sensor conditioner and the
//! progress indicator.
//!
//! All values assume a 200 ms tick, so five ticks make one displayed second
//! and a hold longer than five ticks counts as a long press.

use core::fmt;

/// Hold duration (ticks) that separates a short press from a long press.
pub const LONG_PRESS_TICKS: u16 = 5;
/// Timebase ticks per displayed second of cooking time.
pub const TICKS_PER_SECOND: u16 = 5;
/// Raw samples averaged per sensor window.
pub const SENSOR_WINDOW: usize = 20;
/// Minimum change in the window average before a new reading is reported.
pub const SENSOR_EDGE_THRESHOLD: u16 = 3;
/// Right shift applied to the 12-bit average to obtain the 8-bit control value.
pub const SENSOR_SCALE_SHIFT: u8 = 4;

/// How `time_remaining` is decremented while cooking.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum CountdownPacing {
    /// Decrement on every tick and once more on every fifth tick.
    #[default]
    Compounded,
    /// Decrement only on every fifth tick, one step per displayed second.
    OncePerSecond,
}

impl CountdownPacing {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            CountdownPacing::Compounded => "compounded",
            CountdownPacing::OncePerSecond => "once-per-second",
        }
    }
}

/// Sensor conditioning parameters.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SensorConfig {
    pub edge_threshold: u16,
    pub scale_shift: u8,
}

impl SensorConfig {
    #[must_use]
    pub const fn new(edge_threshold: u16, scale_shift: u8) -> Self {
        Self {
            edge_threshold,
            scale_shift,
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self::new(SENSOR_EDGE_THRESHOLD, SENSOR_SCALE_SHIFT)
    }
}

/// Controller configuration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct OvenConfig {
    pub long_press_ticks: u16,
    pub ticks_per_second: u16,
    pub pacing: CountdownPacing,
    pub sensor: SensorConfig,
}

impl OvenConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            long_press_ticks: LONG_PRESS_TICKS,
            ticks_per_second: TICKS_PER_SECOND,
            pacing: CountdownPacing::Compounded,
            sensor: SensorConfig::new(SENSOR_EDGE_THRESHOLD, SENSOR_SCALE_SHIFT),
        }
    }

    /// Returns a copy using the given countdown pacing.
    #[must_use]
    pub const fn with_pacing(mut self, pacing: CountdownPacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Checks the invariants the controller relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.ticks_per_second == 0 {
            return Err(ConfigError::ZeroTicksPerSecond);
        }
        if self.sensor.edge_threshold == 0 {
            return Err(ConfigError::ZeroEdgeThreshold);
        }
        if self.sensor.scale_shift >= 16 {
            return Err(ConfigError::ScaleShiftTooWide(self.sensor.scale_shift));
        }
        Ok(())
    }
}

impl Default for OvenConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Reasons an [`OvenConfig`] is rejected.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// The progress divisor and per-second pacing would divide by zero.
    ZeroTicksPerSecond,
    /// A zero threshold would report every window, defeating the hysteresis.
    ZeroEdgeThreshold,
    /// Shifting a 16-bit average by this much leaves nothing.
    ScaleShiftTooWide(u8),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroTicksPerSecond => f.write_str("ticks_per_second must be non-zero"),
            ConfigError::ZeroEdgeThreshold => f.write_str("sensor edge threshold must be non-zero"),
            ConfigError::ScaleShiftTooWide(shift) => {
                write!(f, "sensor scale shift {shift} must be below 16")
            }
        }
    }
}

//! Board timing.
//!
//! The core counts in ticks; these periods bind a tick (and the input scan
//! rates) to wall-clock time on the target.

use embassy_time::Duration;
use oven_core::config::OvenConfig;

/// Timebase period. Five ticks make one displayed second.
pub const TICK_PERIOD: Duration = Duration::from_millis(200);
/// Interval between button level scans.
pub const BUTTON_SCAN_PERIOD: Duration = Duration::from_millis(10);
/// Consecutive identical scans required before a level change is accepted.
pub const DEBOUNCE_SCANS: u8 = 3;
/// Interval between raw dial samples; one window completes every 100 ms.
pub const SENSOR_SAMPLE_PERIOD: Duration = Duration::from_millis(5);

/// Controller configuration used on the board.
pub const OVEN_CONFIG: OvenConfig = OvenConfig::new();

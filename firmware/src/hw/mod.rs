//! Board collaborators: the LED bar, the two panel buttons and the dial.
//!
//! Pin assignment is fixed by the runtime; these wrappers only translate
//! between GPIO levels and the types `oven-core` consumes.

use embassy_stm32::gpio::{Input, Output};
use oven_core::progress::LedBar;

mod dial;

pub use dial::DialAdc;

/// Number of LEDs on the progress bar.
pub const LED_COUNT: usize = 8;

/// Eight push-pull outputs, bit 0 on the first pin.
pub struct GpioLedBar<'d> {
    pins: [Output<'d>; LED_COUNT],
}

impl<'d> GpioLedBar<'d> {
    #[must_use]
    pub fn new(pins: [Output<'d>; LED_COUNT]) -> Self {
        Self { pins }
    }
}

impl LedBar for GpioLedBar<'_> {
    fn set_pattern(&mut self, bits: u8) {
        for (index, pin) in self.pins.iter_mut().enumerate() {
            if bits & (1 << index) != 0 {
                pin.set_high();
            } else {
                pin.set_low();
            }
        }
    }

    fn pattern(&self) -> u8 {
        self.pins
            .iter()
            .enumerate()
            .filter(|(_, pin)| pin.is_set_high())
            .fold(0, |bits, (index, _)| bits | (1 << index))
    }
}

/// Buttons 3 and 4, active low with internal pull-ups.
pub struct PanelButtons<'d> {
    three: Input<'d>,
    four: Input<'d>,
}

impl<'d> PanelButtons<'d> {
    #[must_use]
    pub fn new(three: Input<'d>, four: Input<'d>) -> Self {
        Self { three, four }
    }

    /// Raw pressed levels in `Button::ALL` order.
    #[must_use]
    pub fn pressed(&self) -> [bool; 2] {
        [self.three.is_low(), self.four.is_low()]
    }
}

//! Potentiometer sampling on the STM32G0 ADC.

use embassy_stm32::adc::{Adc, AnyAdcChannel, SampleTime};
use embassy_stm32::peripherals::ADC1;

/// Embassy ADC wrapper that produces raw 12-bit dial samples.
pub struct DialAdc<'d> {
    adc: Adc<'d, ADC1>,
    channel: AnyAdcChannel<ADC1>,
}

impl<'d> DialAdc<'d> {
    #[must_use]
    pub fn new(mut adc: Adc<'d, ADC1>, channel: AnyAdcChannel<ADC1>) -> Self {
        adc.set_sample_time(SampleTime::CYCLES79_5);
        Self { adc, channel }
    }

    pub fn sample(&mut self) -> u16 {
        self.adc.blocking_read(&mut self.channel)
    }
}

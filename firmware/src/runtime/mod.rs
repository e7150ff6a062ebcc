use cortex_m::interrupt;
use cortex_m::register::primask;
use critical_section::{self, RawRestoreState};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_stm32 as hal;
use embassy_stm32::adc::{Adc, AdcChannel};
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use oven_core::handoff::EventFlags;
use oven_core::timebase::Timebase;

use crate::config::OVEN_CONFIG;
use crate::hw::{DialAdc, GpioLedBar, PanelButtons};

mod input_task;
mod oven_task;
mod tick_task;

critical_section::set_impl!(InterruptCriticalSection);

struct InterruptCriticalSection;

unsafe impl critical_section::Impl for InterruptCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        let primask = primask::read();
        interrupt::disable();
        primask.is_active()
    }

    unsafe fn release(restore_state: RawRestoreState) {
        if restore_state {
            unsafe {
                interrupt::enable();
            }
        }
    }
}

pub(super) static TIMEBASE: Timebase = Timebase::new();
pub(super) static EVENTS: EventFlags = EventFlags::new();
/// Raised by every producer; the oven task sleeps on it between batches.
pub(super) static WAKE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

#[embassy_executor::main]
pub async fn main(spawner: Spawner) {
    let config = hal::Config::default();
    let hal::Peripherals {
        PA0,
        PA6,
        PA7,
        PB0,
        PB1,
        PB2,
        PB3,
        PB4,
        PB5,
        PB6,
        PB7,
        ADC1,
        ..
    } = hal::init(config);

    if let Err(error) = OVEN_CONFIG.validate() {
        defmt::error!("config: {}", defmt::Display2Format(&error));
    }

    let leds = GpioLedBar::new([
        Output::new(PB0, Level::Low, Speed::Low),
        Output::new(PB1, Level::Low, Speed::Low),
        Output::new(PB2, Level::Low, Speed::Low),
        Output::new(PB3, Level::Low, Speed::Low),
        Output::new(PB4, Level::Low, Speed::Low),
        Output::new(PB5, Level::Low, Speed::Low),
        Output::new(PB6, Level::Low, Speed::Low),
        Output::new(PB7, Level::Low, Speed::Low),
    ]);
    let panel = PanelButtons::new(Input::new(PA6, Pull::Up), Input::new(PA7, Pull::Up));
    let dial = DialAdc::new(Adc::new(ADC1), PA0.degrade_adc());

    spawner
        .spawn(oven_task::run(leds))
        .expect("failed to spawn oven task");
    spawner
        .spawn(input_task::run(panel, dial))
        .expect("failed to spawn input task");
    spawner
        .spawn(tick_task::run())
        .expect("failed to spawn tick task");

    core::future::pending::<()>().await;
}

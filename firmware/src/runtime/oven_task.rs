use oven_core::event_loop::dispatch_pending;
use oven_core::oven::OvenController;

use super::{EVENTS, TIMEBASE, WAKE};
use crate::config::OVEN_CONFIG;
use crate::display::LogDisplay;
use crate::hw::GpioLedBar;
use crate::telemetry::TelemetryRecorder;

#[embassy_executor::task]
pub async fn run(leds: GpioLedBar<'static>) -> ! {
    let mut controller = OvenController::new(leds, OVEN_CONFIG);
    let mut display = LogDisplay::new();
    let mut telemetry = TelemetryRecorder::new();

    controller.initialize(&mut display);
    defmt::info!("oven: ready, pacing={}", OVEN_CONFIG.pacing.label());

    loop {
        WAKE.wait().await;
        while let Some(outcome) =
            dispatch_pending(&mut controller, &TIMEBASE, &EVENTS, &mut display)
        {
            let data = controller.data();
            telemetry.record_step(&outcome, data.mode(), data.time_remaining(), TIMEBASE.now());
        }
    }
}

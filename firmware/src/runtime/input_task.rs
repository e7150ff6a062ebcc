use embassy_futures::join::join;
use embassy_time::Ticker;
use oven_core::sensor::SensorConditioner;

use super::{EVENTS, WAKE};
use crate::buttons::ButtonScanner;
use crate::config::{BUTTON_SCAN_PERIOD, DEBOUNCE_SCANS, OVEN_CONFIG, SENSOR_SAMPLE_PERIOD};
use crate::hw::{DialAdc, PanelButtons};

#[embassy_executor::task]
pub async fn run(panel: PanelButtons<'static>, mut dial: DialAdc<'static>) -> ! {
    let buttons = async {
        let mut scanner = ButtonScanner::new(DEBOUNCE_SCANS);
        let mut ticker = Ticker::every(BUTTON_SCAN_PERIOD);
        loop {
            ticker.next().await;
            let events = scanner.scan(panel.pressed());
            if !events.is_empty() {
                EVENTS.raise_buttons(events);
                WAKE.signal(());
            }
        }
    };

    let sensor = async {
        let mut conditioner: SensorConditioner = SensorConditioner::new(OVEN_CONFIG.sensor);
        let mut ticker = Ticker::every(SENSOR_SAMPLE_PERIOD);
        loop {
            ticker.next().await;
            if let Some(reading) = conditioner.on_sample(dial.sample()) {
                EVENTS.publish_reading(reading);
                WAKE.signal(());
            }
        }
    };

    join(buttons, sensor).await;
}

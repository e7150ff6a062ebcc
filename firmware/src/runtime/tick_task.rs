use embassy_time::Ticker;

use super::{TIMEBASE, WAKE};
use crate::config::TICK_PERIOD;

#[embassy_executor::task]
pub async fn run() -> ! {
    let mut ticker = Ticker::every(TICK_PERIOD);
    loop {
        ticker.next().await;
        TIMEBASE.on_tick();
        WAKE.signal(());
    }
}

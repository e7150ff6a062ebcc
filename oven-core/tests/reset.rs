use oven_core::buttons::ButtonEvents;
use oven_core::config::OvenConfig;
use oven_core::oven::{CookMode, OvenController, OvenInputs, OvenState};
use oven_core::progress::LatchedLedBar;
use oven_core::sensor::StableReading;
use oven_core::timebase::Ticks;

/// BROIL, 30 s, cooking since tick 0.
fn broiling() -> OvenController<LatchedLedBar> {
    let mut oven = OvenController::new(LatchedLedBar::new(), OvenConfig::default());
    oven.step(&OvenInputs::buttons(ButtonEvents::THREE_DOWN), Ticks::new(0));
    oven.step(&OvenInputs::buttons(ButtonEvents::THREE_UP), Ticks::new(1));
    oven.step(&OvenInputs::buttons(ButtonEvents::THREE_DOWN), Ticks::new(2));
    oven.step(&OvenInputs::buttons(ButtonEvents::THREE_UP), Ticks::new(3));
    assert_eq!(oven.data().mode(), CookMode::Broil);

    let reading = StableReading::from_average(29 << 4, 4);
    oven.step(&OvenInputs::reading(reading), Ticks::new(0));
    oven.step(&OvenInputs::buttons(ButtonEvents::FOUR_DOWN), Ticks::new(0));
    assert_eq!(oven.data().state(), OvenState::Cooking);
    oven
}

fn hold_four(oven: &mut OvenController<LatchedLedBar>, down: u16, up: u16) -> OvenState {
    oven.step(&OvenInputs::buttons(ButtonEvents::FOUR_DOWN), Ticks::new(down));
    assert_eq!(
        oven.data().state(),
        OvenState::ResetPending {
            pressed_at: Ticks::new(down)
        }
    );
    oven.step(&OvenInputs::buttons(ButtonEvents::FOUR_UP), Ticks::new(up))
        .to
}

#[test]
fn short_hold_resumes_cooking_unchanged() {
    let mut oven = broiling();
    oven.step(&OvenInputs::tick(), Ticks::new(1));
    let remaining = oven.data().time_remaining();

    assert_eq!(hold_four(&mut oven, 2, 7), OvenState::Cooking);
    assert_eq!(oven.data().time_remaining(), remaining);
    assert_eq!(oven.data().temperature(), 500);
    assert_eq!(oven.progress().started_at(), Ticks::new(2));
}

#[test]
fn long_hold_cancels_back_to_setup() {
    let mut oven = broiling();
    for now in 1..=3 {
        oven.step(&OvenInputs::tick(), Ticks::new(now));
    }
    assert!(oven.data().time_remaining() < 30);

    assert_eq!(hold_four(&mut oven, 4, 10), OvenState::Setup);
    let data = oven.data();
    assert_eq!(data.time_remaining(), 30);
    assert_eq!(data.time_remaining(), data.initial_time());
    assert_eq!(data.temperature(), 500);
    assert_eq!(oven.snapshot().leds, 0x00);
}

#[test]
fn countdown_pauses_while_cancel_is_pending() {
    let mut oven = broiling();
    oven.step(&OvenInputs::buttons(ButtonEvents::FOUR_DOWN), Ticks::new(1));
    let remaining = oven.data().time_remaining();

    for now in 2..=4 {
        let outcome = oven.step(&OvenInputs::tick(), Ticks::new(now));
        assert!(!outcome.refresh_display);
    }
    let reading = StableReading::from_average(200 << 4, 4);
    oven.step(&OvenInputs::reading(reading), Ticks::new(4));

    assert_eq!(oven.data().time_remaining(), remaining);
    assert!(matches!(
        oven.data().state(),
        OvenState::ResetPending { .. }
    ));
}

#[test]
fn snapshot_keeps_heating_during_pending_cancel() {
    let mut oven = broiling();
    oven.step(&OvenInputs::buttons(ButtonEvents::FOUR_DOWN), Ticks::new(1));
    let snapshot = oven.snapshot();
    assert!(snapshot.state.is_heating());
    assert_eq!(snapshot.leds, 0xFF);
}

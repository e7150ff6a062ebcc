use oven_core::buttons::ButtonEvents;
use oven_core::config::{CountdownPacing, OvenConfig};
use oven_core::display::SnapshotLatch;
use oven_core::event_loop::dispatch_pending;
use oven_core::handoff::EventFlags;
use oven_core::oven::{CookMode, OvenController, OvenInputs, OvenState, Selector};
use oven_core::progress::LatchedLedBar;
use oven_core::sensor::StableReading;
use oven_core::timebase::{Ticks, Timebase};

fn reading(scaled: u8) -> StableReading {
    StableReading::from_average(u16::from(scaled) << 4, 4)
}

fn cooking_with(scaled: u8, start: u16) -> OvenController<LatchedLedBar> {
    let mut oven = OvenController::new(LatchedLedBar::new(), OvenConfig::default());
    oven.step(&OvenInputs::reading(reading(scaled)), Ticks::new(start));
    oven.step(
        &OvenInputs::buttons(ButtonEvents::FOUR_DOWN),
        Ticks::new(start),
    );
    assert_eq!(oven.data().state(), OvenState::Cooking);
    oven
}

#[test]
fn dial_then_start_scenario() {
    let timebase = Timebase::new();
    let flags = EventFlags::new();
    let mut display = SnapshotLatch::new();
    let mut oven = OvenController::new(LatchedLedBar::new(), OvenConfig::default());
    oven.initialize(&mut display);

    let initial = display.latest().copied().expect("initial frame rendered");
    assert_eq!(initial.state, OvenState::Setup);
    assert_eq!(initial.mode, CookMode::Bake);
    assert_eq!(initial.time_remaining, 1);
    assert_eq!(initial.temperature, 350);
    assert_eq!(initial.leds, 0x00);

    flags.publish_reading(reading(10));
    dispatch_pending(&mut oven, &timebase, &flags, &mut display).expect("reading pending");
    assert_eq!(oven.data().time_remaining(), 11);

    flags.raise_buttons(ButtonEvents::FOUR_DOWN);
    let outcome =
        dispatch_pending(&mut oven, &timebase, &flags, &mut display).expect("press pending");
    assert_eq!(outcome.to, OvenState::Cooking);
    assert_eq!(oven.data().initial_time(), 11);
    assert_eq!(oven.snapshot().leds, 0xFF);
}

#[test]
fn last_second_completes_and_restores_settings() {
    let mut oven = cooking_with(0, 1);
    assert_eq!(oven.data().time_remaining(), 1);

    let outcome = oven.step(&OvenInputs::tick(), Ticks::new(2));
    assert_eq!(outcome.from, OvenState::Cooking);
    assert_eq!(outcome.to, OvenState::Setup);
    assert!(outcome.refresh_display);

    let data = oven.data();
    assert_eq!(data.time_remaining(), data.initial_time());
    assert_eq!(data.time_remaining(), 1);
    assert_eq!(data.temperature(), 350);
    assert_eq!(oven.snapshot().leds, 0x00);
}

#[test]
fn completion_resets_dialled_bake_temperature() {
    let mut oven = OvenController::new(LatchedLedBar::new(), OvenConfig::default());
    oven.step(&OvenInputs::buttons(ButtonEvents::THREE_DOWN), Ticks::new(0));
    oven.step(&OvenInputs::buttons(ButtonEvents::THREE_UP), Ticks::new(6));
    assert_eq!(oven.data().selector(), Selector::Temp);

    oven.step(&OvenInputs::reading(reading(125)), Ticks::new(7));
    assert_eq!(oven.data().temperature(), 425);

    oven.step(&OvenInputs::buttons(ButtonEvents::FOUR_DOWN), Ticks::new(8));
    let mut now = 8;
    while oven.data().state() == OvenState::Cooking {
        now += 1;
        oven.step(&OvenInputs::tick(), Ticks::new(now));
    }
    assert_eq!(oven.data().state(), OvenState::Setup);
    assert_eq!(oven.data().temperature(), 350);
}

#[test]
fn countdown_terminates_within_initial_time_ticks() {
    let mut oven = cooking_with(10, 0);
    let initial = oven.data().initial_time();

    let mut ticks = 0_u16;
    let mut previous = oven.data().time_remaining();
    while oven.data().state() == OvenState::Cooking {
        ticks += 1;
        oven.step(&OvenInputs::tick(), Ticks::new(ticks));
        if oven.data().state() == OvenState::Cooking {
            let remaining = oven.data().time_remaining();
            assert!(remaining < previous, "every tick should count down");
            previous = remaining;
        }
        assert!(ticks <= initial, "countdown exceeded {initial} ticks");
    }

    assert!(ticks * 2 >= initial);
    assert_eq!(oven.data().time_remaining(), initial);
}

#[test]
fn progress_bar_drains_by_eighths() {
    // 40 s: five seconds per eighth, 25 ticks at 5 ticks/s.
    let mut oven = cooking_with(39, 0);
    assert_eq!(oven.data().time_remaining(), 40);

    for now in 1..=24 {
        oven.step(&OvenInputs::tick(), Ticks::new(now));
        assert_eq!(oven.snapshot().leds, 0xFF, "tick {now}");
    }
    oven.step(&OvenInputs::tick(), Ticks::new(25));
    assert_eq!(oven.snapshot().leds, 0xFE);
    assert_eq!(oven.data().state(), OvenState::Cooking);
}

#[test]
fn cooking_refreshes_display_every_invocation() {
    let mut oven = cooking_with(50, 0);

    let outcome = oven.step(&OvenInputs::tick(), Ticks::new(1));
    assert!(outcome.refresh_display);
    assert!(!outcome.transitioned());

    let outcome = oven.step(&OvenInputs::reading(reading(3)), Ticks::new(1));
    assert!(outcome.refresh_display);
    assert_eq!(oven.data().time_remaining(), 50, "dial is ignored while cooking");
}

#[test]
fn once_per_second_pacing_counts_whole_seconds() {
    let config = OvenConfig::default().with_pacing(CountdownPacing::OncePerSecond);
    let mut oven = OvenController::new(LatchedLedBar::new(), config);
    oven.step(&OvenInputs::reading(reading(9)), Ticks::new(0));
    oven.step(&OvenInputs::buttons(ButtonEvents::FOUR_DOWN), Ticks::new(0));

    let mut now = 0_u16;
    while oven.data().state() == OvenState::Cooking {
        now += 1;
        oven.step(&OvenInputs::tick(), Ticks::new(now));
    }
    assert_eq!(now, 50);
    assert_eq!(oven.data().time_remaining(), 10);
}

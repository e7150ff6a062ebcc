use oven_core::buttons::ButtonEvents;
use oven_core::config::{
    CountdownPacing, OvenConfig, SENSOR_EDGE_THRESHOLD, SENSOR_WINDOW, TICKS_PER_SECOND,
};
use oven_core::oven::{OvenController, OvenInputs, OvenState};
use oven_core::progress::LatchedLedBar;
use oven_core::sensor::{SensorConditioner, StableReading};
use oven_core::timebase::Ticks;
use proptest::prelude::*;

const ADC_MAX: u16 = 4_095;

proptest! {
    #[test]
    fn emits_only_on_window_boundaries_with_floor_average(
        samples in proptest::collection::vec(0..=ADC_MAX, 0..200)
    ) {
        let mut conditioner: SensorConditioner = SensorConditioner::default();
        let mut last_stable = 0_u16;

        for (index, &raw) in samples.iter().enumerate() {
            let emitted = conditioner.on_sample(raw);
            let completes_window = (index + 1) % SENSOR_WINDOW == 0;
            if !completes_window {
                prop_assert_eq!(emitted, None);
                continue;
            }

            let window = &samples[index + 1 - SENSOR_WINDOW..=index];
            let sum: u32 = window.iter().copied().map(u32::from).sum();
            let average = u16::try_from(sum / 20).unwrap();
            if average.abs_diff(last_stable) >= SENSOR_EDGE_THRESHOLD {
                last_stable = average;
                prop_assert_eq!(emitted, Some(StableReading::from_average(average, 4)));
            } else {
                prop_assert_eq!(emitted, None);
            }
        }
        prop_assert!(conditioner.cursor() < SENSOR_WINDOW);
    }

    #[test]
    fn jitter_within_threshold_is_never_reported(
        base in 8..=(ADC_MAX - 8),
        offsets in proptest::collection::vec(-2_i32..=2, SENSOR_WINDOW..400)
    ) {
        let mut conditioner: SensorConditioner = SensorConditioner::default();
        for _ in 0..SENSOR_WINDOW {
            conditioner.on_sample(base);
        }
        prop_assert_eq!(conditioner.last_stable(), base);

        for offset in offsets {
            let raw = u16::try_from(i32::from(base) + offset).unwrap();
            prop_assert_eq!(conditioner.on_sample(raw), None);
        }
        prop_assert_eq!(conditioner.last_stable(), base);
    }

    #[test]
    fn countdown_always_returns_to_setup(
        scaled in any::<u8>(),
        start in any::<u16>(),
        once_per_second in any::<bool>(),
    ) {
        let pacing = if once_per_second {
            CountdownPacing::OncePerSecond
        } else {
            CountdownPacing::Compounded
        };
        let config = OvenConfig::default().with_pacing(pacing);
        let mut oven = OvenController::new(LatchedLedBar::new(), config);
        let reading = StableReading::from_average(u16::from(scaled) << 4, 4);
        oven.step(&OvenInputs::reading(reading), Ticks::new(start));
        oven.step(&OvenInputs::buttons(ButtonEvents::FOUR_DOWN), Ticks::new(start));

        let initial = oven.data().initial_time();
        let bound = u32::from(initial) * u32::from(TICKS_PER_SECOND) + u32::from(TICKS_PER_SECOND);
        let mut now = Ticks::new(start);
        let mut ticks = 0_u32;
        while oven.data().state() == OvenState::Cooking {
            prop_assert!(ticks < bound, "countdown did not finish in {} ticks", bound);
            now = now.wrapping_add(1);
            ticks += 1;
            oven.step(&OvenInputs::tick(), now);
        }

        prop_assert_eq!(oven.data().time_remaining(), initial);
        prop_assert_eq!(oven.snapshot().leds, 0);
    }
}

//! Oven control state machine.
//!
//! The controller is the only writer of [`OvenData`]. It is invoked once per
//! batch of pending inputs and evaluates exactly one transition from the
//! current state. Waiting (for a button release, for the countdown) is never
//! a blocking call: the controller stays in a pending state and decides on a
//! later invocation. Inputs that the current state does not recognise are
//! ignored and leave everything unchanged.

use core::fmt;

use crate::buttons::ButtonEvents;
use crate::config::{CountdownPacing, OvenConfig};
use crate::display::{OvenDisplay, OvenSnapshot};
use crate::progress::{LED_ALL_OFF, LED_ALL_ON, LedBar, ProgressIndicator};
use crate::sensor::StableReading;
use crate::timebase::Ticks;

/// Lowest temperature the sensor can select in BAKE mode.
pub const BAKE_TEMPERATURE_FLOOR: u16 = 300;
/// Default temperature for BAKE and TOAST.
pub const DEFAULT_TEMPERATURE: u16 = 350;
/// Fixed BROIL temperature.
pub const BROIL_TEMPERATURE: u16 = 500;

/// Top-level controller state.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OvenState {
    /// Adjusting mode, time and temperature.
    Setup,
    /// Button 3 is held; its release decides between mode and selector.
    SelectorChangePending { pressed_at: Ticks },
    /// Counting down.
    Cooking,
    /// Button 4 is held while cooking; its release decides cancel or resume.
    ResetPending { pressed_at: Ticks },
}

impl OvenState {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            OvenState::Setup => "SETUP",
            OvenState::SelectorChangePending { .. } => "SELECTOR_CHANGE_PENDING",
            OvenState::Cooking => "COOKING",
            OvenState::ResetPending { .. } => "RESET_PENDING",
        }
    }

    /// Heating elements are on while cooking, including a tentative cancel.
    #[must_use]
    pub const fn is_heating(self) -> bool {
        matches!(self, OvenState::Cooking | OvenState::ResetPending { .. })
    }
}

impl fmt::Display for OvenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cooking mode.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum CookMode {
    #[default]
    Bake,
    Toast,
    Broil,
}

impl CookMode {
    /// Mode selected by a short press of button 3.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            CookMode::Bake => CookMode::Toast,
            CookMode::Toast => CookMode::Broil,
            CookMode::Broil => CookMode::Bake,
        }
    }

    #[must_use]
    pub const fn default_temperature(self) -> u16 {
        match self {
            CookMode::Bake | CookMode::Toast => DEFAULT_TEMPERATURE,
            CookMode::Broil => BROIL_TEMPERATURE,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            CookMode::Bake => "BAKE",
            CookMode::Toast => "TOAST",
            CookMode::Broil => "BROIL",
        }
    }
}

impl fmt::Display for CookMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Field adjusted by the sensor while in SETUP. TEMP only matters in BAKE.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Selector {
    #[default]
    Time,
    Temp,
}

impl Selector {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Selector::Time => Selector::Temp,
            Selector::Temp => Selector::Time,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Selector::Time => "TIME",
            Selector::Temp => "TEMP",
        }
    }
}

/// Oven settings and countdown, owned by [`OvenController`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct OvenData {
    state: OvenState,
    mode: CookMode,
    selector: Selector,
    time_remaining: u16,
    initial_time: u16,
    temperature: u16,
}

impl OvenData {
    /// Power-on defaults: SETUP, BAKE, one second at 350°F.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: OvenState::Setup,
            mode: CookMode::Bake,
            selector: Selector::Time,
            time_remaining: 1,
            initial_time: 1,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    #[must_use]
    pub const fn state(&self) -> OvenState {
        self.state
    }

    #[must_use]
    pub const fn mode(&self) -> CookMode {
        self.mode
    }

    #[must_use]
    pub const fn selector(&self) -> Selector {
        self.selector
    }

    /// Cooking seconds remaining.
    #[must_use]
    pub const fn time_remaining(&self) -> u16 {
        self.time_remaining
    }

    /// `time_remaining` as it was when cooking last started.
    #[must_use]
    pub const fn initial_time(&self) -> u16 {
        self.initial_time
    }

    #[must_use]
    pub const fn temperature(&self) -> u16 {
        self.temperature
    }

    fn reset_temperature(&mut self) {
        self.temperature = self.mode.default_temperature();
    }
}

impl Default for OvenData {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the controller consumes in one invocation.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct OvenInputs {
    pub tick: bool,
    pub buttons: ButtonEvents,
    pub reading: Option<StableReading>,
}

impl OvenInputs {
    #[must_use]
    pub const fn tick() -> Self {
        Self {
            tick: true,
            buttons: ButtonEvents::NONE,
            reading: None,
        }
    }

    #[must_use]
    pub const fn buttons(buttons: ButtonEvents) -> Self {
        Self {
            tick: false,
            buttons,
            reading: None,
        }
    }

    #[must_use]
    pub const fn reading(reading: StableReading) -> Self {
        Self {
            tick: false,
            buttons: ButtonEvents::NONE,
            reading: Some(reading),
        }
    }

    /// Returns `true` when at least one event is present.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.tick || !self.buttons.is_empty() || self.reading.is_some()
    }
}

/// What one controller invocation did.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct StepOutcome {
    pub from: OvenState,
    pub to: OvenState,
    pub refresh_display: bool,
}

impl StepOutcome {
    /// Returns `true` when the invocation moved to a different state.
    #[must_use]
    pub fn transitioned(&self) -> bool {
        self.from != self.to
    }
}

/// Next state chosen by a state handler plus whether the display is stale.
struct Transition {
    next: OvenState,
    refresh: bool,
}

impl Transition {
    const fn to(next: OvenState, refresh: bool) -> Self {
        Self { next, refresh }
    }
}

/// The oven controller: state machine plus the LED bar it drives.
pub struct OvenController<L> {
    data: OvenData,
    leds: L,
    config: OvenConfig,
    progress: ProgressIndicator,
}

impl<L: LedBar> OvenController<L> {
    #[must_use]
    pub fn new(leds: L, config: OvenConfig) -> Self {
        Self {
            data: OvenData::new(),
            leds,
            config,
            progress: ProgressIndicator::start(Ticks::ZERO, 0),
        }
    }

    /// Startup sequence: LEDs dark and the initial frame on the display.
    pub fn initialize<D: OvenDisplay + ?Sized>(&mut self, display: &mut D) {
        self.leds.set_pattern(LED_ALL_OFF);
        display.render(&self.snapshot());
    }

    /// Evaluates one transition from the current state for `inputs`
    /// observed at tick `now`.
    pub fn step(&mut self, inputs: &OvenInputs, now: Ticks) -> StepOutcome {
        let from = self.data.state;
        let transition = match from {
            OvenState::Setup => self.on_setup(inputs, now),
            OvenState::SelectorChangePending { pressed_at } => {
                self.on_selector_pending(inputs, now, pressed_at)
            }
            OvenState::Cooking => self.on_cooking(inputs, now),
            OvenState::ResetPending { pressed_at } => {
                self.on_reset_pending(inputs, now, pressed_at)
            }
        };
        self.data.state = transition.next;

        StepOutcome {
            from,
            to: transition.next,
            refresh_display: transition.refresh,
        }
    }

    #[must_use]
    pub const fn data(&self) -> &OvenData {
        &self.data
    }

    #[must_use]
    pub const fn config(&self) -> &OvenConfig {
        &self.config
    }

    #[must_use]
    pub const fn progress(&self) -> &ProgressIndicator {
        &self.progress
    }

    #[must_use]
    pub fn leds(&self) -> &L {
        &self.leds
    }

    /// Everything the display needs for one frame.
    #[must_use]
    pub fn snapshot(&self) -> OvenSnapshot {
        OvenSnapshot {
            state: self.data.state,
            mode: self.data.mode,
            selector: self.data.selector,
            time_remaining: self.data.time_remaining,
            temperature: self.data.temperature,
            leds: self.leds.pattern(),
        }
    }

    fn on_setup(&mut self, inputs: &OvenInputs, now: Ticks) -> Transition {
        let mut refresh = false;
        if let Some(reading) = inputs.reading {
            self.apply_reading(reading);
            refresh = true;
        }

        if inputs.buttons.contains(ButtonEvents::FOUR_DOWN) {
            self.start_cooking(now);
            Transition::to(OvenState::Cooking, refresh)
        } else if inputs.buttons.contains(ButtonEvents::THREE_DOWN) {
            Transition::to(OvenState::SelectorChangePending { pressed_at: now }, refresh)
        } else {
            Transition::to(OvenState::Setup, refresh)
        }
    }

    fn apply_reading(&mut self, reading: StableReading) {
        let scaled = u16::from(reading.scaled);
        match (self.data.mode, self.data.selector) {
            (CookMode::Bake, Selector::Temp) => {
                self.data.temperature = scaled + BAKE_TEMPERATURE_FLOOR;
            }
            _ => self.data.time_remaining = scaled + 1,
        }
    }

    fn start_cooking(&mut self, now: Ticks) {
        self.data.initial_time = self.data.time_remaining;
        self.progress = ProgressIndicator::start(now, self.data.time_remaining);
        self.leds.set_pattern(LED_ALL_ON);
    }

    fn on_selector_pending(
        &mut self,
        inputs: &OvenInputs,
        now: Ticks,
        pressed_at: Ticks,
    ) -> Transition {
        if !inputs.buttons.contains(ButtonEvents::THREE_UP) {
            return Transition::to(self.data.state, false);
        }

        if now.wrapping_since(pressed_at) > self.config.long_press_ticks {
            self.data.selector = self.data.selector.toggled();
        } else {
            self.data.mode = self.data.mode.next();
            self.data.reset_temperature();
        }
        Transition::to(OvenState::Setup, true)
    }

    fn on_cooking(&mut self, inputs: &OvenInputs, now: Ticks) -> Transition {
        if inputs.tick && self.countdown_tick(now) {
            return Transition::to(OvenState::Setup, true);
        }

        if inputs.buttons.contains(ButtonEvents::FOUR_DOWN) {
            self.progress = self.progress.restarted_at(now);
            return Transition::to(OvenState::ResetPending { pressed_at: now }, true);
        }

        Transition::to(OvenState::Cooking, true)
    }

    /// Advances the countdown by one tick. Returns `true` once cooking is
    /// finished and the settings have been restored.
    fn countdown_tick(&mut self, now: Ticks) -> bool {
        let ticks_per_second = self.config.ticks_per_second;

        if self.data.time_remaining == 0 {
            self.leds.set_pattern(LED_ALL_OFF);
            self.data.reset_temperature();
            self.data.time_remaining = 1;
        } else {
            if self.config.pacing == CountdownPacing::Compounded {
                self.data.time_remaining -= 1;
            }
            self.leds
                .set_pattern(self.progress.pattern_at(now, ticks_per_second));
        }

        if now.is_multiple_of(ticks_per_second) {
            self.data.time_remaining = self.data.time_remaining.saturating_sub(1);
        }

        if self.data.time_remaining != 0 {
            return false;
        }

        self.leds.set_pattern(LED_ALL_OFF);
        self.data.reset_temperature();
        self.data.time_remaining = self.data.initial_time;
        true
    }

    fn on_reset_pending(
        &mut self,
        inputs: &OvenInputs,
        now: Ticks,
        pressed_at: Ticks,
    ) -> Transition {
        if !inputs.buttons.contains(ButtonEvents::FOUR_UP) {
            return Transition::to(self.data.state, false);
        }

        if now.wrapping_since(pressed_at) > self.config.long_press_ticks {
            self.data.time_remaining = self.data.initial_time;
            self.data.reset_temperature();
            self.leds.set_pattern(LED_ALL_OFF);
            Transition::to(OvenState::Setup, true)
        } else {
            Transition::to(OvenState::Cooking, true)
        }
    }
}

impl<L: LedBar + Default> Default for OvenController<L> {
    fn default() -> Self {
        Self::new(L::default(), OvenConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::LatchedLedBar;

    fn controller() -> OvenController<LatchedLedBar> {
        OvenController::new(LatchedLedBar::new(), OvenConfig::default())
    }

    fn reading(scaled: u8) -> OvenInputs {
        OvenInputs::reading(StableReading::from_average(u16::from(scaled) << 4, 4))
    }

    #[test]
    fn power_on_defaults() {
        let oven = controller();
        let data = oven.data();
        assert_eq!(data.state(), OvenState::Setup);
        assert_eq!(data.mode(), CookMode::Bake);
        assert_eq!(data.selector(), Selector::Time);
        assert_eq!(data.time_remaining(), 1);
        assert_eq!(data.temperature(), 350);
    }

    #[test]
    fn reading_sets_time_and_requests_refresh() {
        let mut oven = controller();
        let outcome = oven.step(&reading(10), Ticks::new(3));
        assert_eq!(oven.data().time_remaining(), 11);
        assert!(outcome.refresh_display);
        assert!(!outcome.transitioned());
    }

    #[test]
    fn unrecognised_events_leave_state_untouched() {
        let mut oven = controller();
        let before = *oven.data();

        let outcome = oven.step(&OvenInputs::tick(), Ticks::new(1));
        assert_eq!(*oven.data(), before);
        assert!(!outcome.refresh_display);

        let outcome = oven.step(&OvenInputs::buttons(ButtonEvents::FOUR_UP), Ticks::new(2));
        assert_eq!(*oven.data(), before);
        assert!(!outcome.refresh_display);
    }

    #[test]
    fn start_takes_precedence_over_selector_press() {
        let mut oven = controller();
        let both = ButtonEvents::THREE_DOWN | ButtonEvents::FOUR_DOWN;
        oven.step(&OvenInputs::buttons(both), Ticks::new(7));
        assert_eq!(oven.data().state(), OvenState::Cooking);
    }

    #[test]
    fn selector_pending_ignores_everything_but_release() {
        let mut oven = controller();
        oven.step(&OvenInputs::buttons(ButtonEvents::THREE_DOWN), Ticks::new(2));
        let pending = oven.data().state();
        assert_eq!(pending, OvenState::SelectorChangePending { pressed_at: Ticks::new(2) });

        oven.step(&reading(40), Ticks::new(3));
        oven.step(&OvenInputs::tick(), Ticks::new(4));
        oven.step(&OvenInputs::buttons(ButtonEvents::FOUR_DOWN), Ticks::new(5));
        assert_eq!(oven.data().state(), pending);
        assert_eq!(oven.data().time_remaining(), 1);
    }

    #[test]
    fn once_per_second_pacing_only_decrements_on_fifth_ticks() {
        let config = OvenConfig::default().with_pacing(CountdownPacing::OncePerSecond);
        let mut oven = OvenController::new(LatchedLedBar::new(), config);
        oven.step(&reading(2), Ticks::new(1));
        oven.step(&OvenInputs::buttons(ButtonEvents::FOUR_DOWN), Ticks::new(1));
        assert_eq!(oven.data().time_remaining(), 3);

        for now in 2..=4 {
            oven.step(&OvenInputs::tick(), Ticks::new(now));
            assert_eq!(oven.data().time_remaining(), 3);
        }
        oven.step(&OvenInputs::tick(), Ticks::new(5));
        assert_eq!(oven.data().time_remaining(), 2);

        for now in 6..=15 {
            oven.step(&OvenInputs::tick(), Ticks::new(now));
        }
        assert_eq!(oven.data().state(), OvenState::Setup);
        assert_eq!(oven.data().time_remaining(), 3);
    }
}

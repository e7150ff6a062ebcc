//! Front-panel button scanning.
//!
//! Both buttons are polled at a fixed rate. A level change is accepted only
//! after it has been seen on `required` consecutive scans; each accepted
//! change becomes one down or up edge in the returned [`ButtonEvents`].

use oven_core::buttons::{Button, ButtonEvents};

#[derive(Copy, Clone, Debug, Default)]
struct Debounced {
    pressed: bool,
    streak: u8,
}

impl Debounced {
    /// Returns the new level when a change has just been accepted.
    fn update(&mut self, pressed: bool, required: u8) -> Option<bool> {
        if pressed == self.pressed {
            self.streak = 0;
            return None;
        }
        self.streak = self.streak.saturating_add(1);
        if self.streak < required {
            return None;
        }
        self.pressed = pressed;
        self.streak = 0;
        Some(pressed)
    }
}

/// Edge detector and debouncer for buttons 3 and 4.
#[derive(Clone, Debug)]
pub struct ButtonScanner {
    buttons: [Debounced; 2],
    required: u8,
}

impl ButtonScanner {
    #[must_use]
    pub const fn new(required: u8) -> Self {
        Self {
            buttons: [Debounced {
                pressed: false,
                streak: 0,
            }; 2],
            required: if required == 0 { 1 } else { required },
        }
    }

    /// Feeds one scan. `pressed` is indexed like [`Button::ALL`].
    pub fn scan(&mut self, pressed: [bool; 2]) -> ButtonEvents {
        let mut events = ButtonEvents::NONE;
        let scanned = Button::ALL.into_iter().zip(&mut self.buttons).zip(pressed);
        for ((button, state), level) in scanned {
            match state.update(level, self.required) {
                Some(true) => events |= ButtonEvents::down(button),
                Some(false) => events |= ButtonEvents::up(button),
                None => {}
            }
        }
        events
    }

    #[must_use]
    pub fn is_pressed(&self, button: Button) -> bool {
        match button {
            Button::Three => self.buttons[0].pressed,
            Button::Four => self.buttons[1].pressed,
        }
    }
}

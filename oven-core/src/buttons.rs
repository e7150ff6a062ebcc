//! Button event vocabulary consumed by the controller.
//!
//! Edge detection and debouncing happen upstream; the core only sees a
//! bitmask of down/up edges per polling interval.

use core::fmt;
use core::ops::{BitOr, BitOrAssign};

/// Logical buttons wired to the oven front panel.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Button {
    /// Mode / selector button.
    Three,
    /// Start / cancel button.
    Four,
}

impl Button {
    pub const ALL: [Button; 2] = [Button::Three, Button::Four];

    /// Looks a button up by its front-panel number.
    #[must_use]
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            3 => Some(Button::Three),
            4 => Some(Button::Four),
            _ => None,
        }
    }

    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Button::Three => 3,
            Button::Four => 4,
        }
    }
}

/// Bitmask of button edges observed during one polling interval.
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct ButtonEvents(u8);

impl ButtonEvents {
    pub const NONE: Self = Self(0);
    pub const THREE_DOWN: Self = Self(0x01);
    pub const THREE_UP: Self = Self(0x02);
    pub const FOUR_DOWN: Self = Self(0x04);
    pub const FOUR_UP: Self = Self(0x08);

    const ALL_BITS: u8 = 0x0F;

    /// Builds a mask from raw bits, dropping anything outside the vocabulary.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL_BITS)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn down(button: Button) -> Self {
        match button {
            Button::Three => Self::THREE_DOWN,
            Button::Four => Self::FOUR_DOWN,
        }
    }

    #[must_use]
    pub const fn up(button: Button) -> Self {
        match button {
            Button::Three => Self::THREE_UP,
            Button::Four => Self::FOUR_UP,
        }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` when every bit of `other` is present.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }
}

impl BitOr for ButtonEvents {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ButtonEvents {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for ButtonEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ButtonEvents({self})")
    }
}

impl fmt::Display for ButtonEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(ButtonEvents, &str); 4] = [
            (ButtonEvents::THREE_DOWN, "3-down"),
            (ButtonEvents::THREE_UP, "3-up"),
            (ButtonEvents::FOUR_DOWN, "4-down"),
            (ButtonEvents::FOUR_UP, "4-up"),
        ];

        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for (flag, name) in NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

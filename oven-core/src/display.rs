//! Display collaborator contract and the text frame shown on the panel.
//!
//! The controller hands the display a complete [`OvenSnapshot`] whenever the
//! visible state changes. [`DisplayFrame`] renders the four-line panel
//! layout so the firmware log and the emulator show identical frames.

use core::fmt::{self, Write};

use heapless::String;

use crate::oven::{CookMode, OvenState, Selector};

/// Bytes needed for one rendered frame.
pub const FRAME_CAPACITY: usize = 128;

const ELEMENT_WIDTH: usize = 5;

/// Oven state as presented to the display.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct OvenSnapshot {
    pub state: OvenState,
    pub mode: CookMode,
    pub selector: Selector,
    pub time_remaining: u16,
    pub temperature: u16,
    pub leds: u8,
}

/// Display collaborator. Rendering is synchronous and has no effect on the
/// controller.
pub trait OvenDisplay {
    fn render(&mut self, snapshot: &OvenSnapshot);
}

impl<T: OvenDisplay + ?Sized> OvenDisplay for &mut T {
    fn render(&mut self, snapshot: &OvenSnapshot) {
        (**self).render(snapshot);
    }
}

/// Display that keeps the most recent snapshot and counts renders.
#[derive(Clone, Debug, Default)]
pub struct SnapshotLatch {
    latest: Option<OvenSnapshot>,
    renders: usize,
}

impl SnapshotLatch {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: None,
            renders: 0,
        }
    }

    #[must_use]
    pub const fn latest(&self) -> Option<&OvenSnapshot> {
        self.latest.as_ref()
    }

    #[must_use]
    pub const fn renders(&self) -> usize {
        self.renders
    }
}

impl OvenDisplay for SnapshotLatch {
    fn render(&mut self, snapshot: &OvenSnapshot) {
        self.latest = Some(*snapshot);
        self.renders = self.renders.saturating_add(1);
    }
}

/// Four-line panel layout for a snapshot.
#[derive(Copy, Clone, Debug)]
pub struct DisplayFrame<'a>(pub &'a OvenSnapshot);

impl fmt::Display for DisplayFrame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.0;
        let heating = snapshot.state.is_heating();
        let (top, bottom) = if heating { ('~', '~') } else { ('-', '_') };
        let minutes = snapshot.time_remaining / 60;
        let seconds = snapshot.time_remaining % 60;
        let (time_marker, temp_marker) = match (snapshot.mode, snapshot.selector) {
            (CookMode::Bake, Selector::Temp) => (' ', '>'),
            (CookMode::Bake, Selector::Time) | (CookMode::Toast | CookMode::Broil, _) => ('>', ' '),
        };

        f.write_char('|')?;
        repeat(f, top)?;
        writeln!(f, "| MODE: {}", snapshot.mode)?;
        writeln!(f, "|     |{time_marker}Time: {minutes}:{seconds:02}")?;
        match snapshot.mode {
            CookMode::Bake | CookMode::Broil => writeln!(
                f,
                "|-----|{temp_marker}Temp: {}\u{b0}F",
                snapshot.temperature
            )?,
            CookMode::Toast => writeln!(f, "|-----|")?,
        }
        f.write_char('|')?;
        repeat(f, bottom)?;
        f.write_char('|')
    }
}

fn repeat(f: &mut fmt::Formatter<'_>, glyph: char) -> fmt::Result {
    for _ in 0..ELEMENT_WIDTH {
        f.write_char(glyph)?;
    }
    Ok(())
}

/// Renders `snapshot` into a fixed-capacity buffer, replacing its contents.
///
/// # Errors
///
/// Fails when the frame does not fit in `N` bytes.
pub fn render_frame<const N: usize>(snapshot: &OvenSnapshot, out: &mut String<N>) -> fmt::Result {
    out.clear();
    write!(out, "{}", DisplayFrame(snapshot))
}

//! Display collaborator that logs each rendered frame.

use heapless::String;
use oven_core::display::{FRAME_CAPACITY, OvenDisplay, OvenSnapshot, render_frame};

/// Renders frames into a fixed buffer and logs them line by line.
pub struct LogDisplay {
    frame: String<FRAME_CAPACITY>,
    frames: u32,
}

impl LogDisplay {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frame: String::new(),
            frames: 0,
        }
    }

    /// Text of the most recent frame.
    #[must_use]
    pub fn frame(&self) -> &str {
        &self.frame
    }

    #[must_use]
    pub const fn frames(&self) -> u32 {
        self.frames
    }
}

impl Default for LogDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl OvenDisplay for LogDisplay {
    fn render(&mut self, snapshot: &OvenSnapshot) {
        if render_frame(snapshot, &mut self.frame).is_err() {
            emit_overflow(self.frames);
            return;
        }
        self.frames = self.frames.wrapping_add(1);
        for line in self.frame.lines() {
            emit_line(self.frames, line);
        }
    }
}

#[cfg(target_os = "none")]
fn emit_line(frame: u32, line: &str) {
    defmt::info!("display[{}] {}", frame, line);
}

#[cfg(not(target_os = "none"))]
fn emit_line(frame: u32, line: &str) {
    println!("display[{frame}] {line}");
}

#[cfg(target_os = "none")]
fn emit_overflow(frame: u32) {
    defmt::warn!("display: frame after {} does not fit", frame);
}

#[cfg(not(target_os = "none"))]
fn emit_overflow(frame: u32) {
    println!("display: frame after {frame} does not fit");
}

use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant as HostInstant};

use crossterm::style::Stylize;
use oven_core::buttons::ButtonEvents;
use oven_core::config::{OvenConfig, SENSOR_SCALE_SHIFT};
use oven_core::display::{DisplayFrame, OvenSnapshot, SnapshotLatch};
use oven_core::event_loop::dispatch_pending;
use oven_core::handoff::EventFlags;
use oven_core::oven::OvenController;
use oven_core::progress::{LatchedLedBar, LedBar};
use oven_core::sensor::SensorConditioner;
use oven_core::timebase::Timebase;

use crate::script::{Command, ScriptError, parse_command};

pub const HELP_TOPICS: &[(&str, &str)] = &[
    ("tick", "tick [n]                  - advance the timebase by n ticks (200 ms each)"),
    ("sample", "sample <raw> [n]          - feed n raw 12-bit dial samples"),
    ("dial", "dial <0-255>              - turn the dial; feeds one full sample window"),
    ("press", "press <3|4> [hold=<ticks>] - press, hold for n ticks, release"),
    ("down", "down <3|4>                - press a button and keep it held"),
    ("up", "up <3|4>                  - release a held button"),
    ("status", "status                    - show the panel and LED bar"),
    ("help", "help [topic]              - show help for a command"),
    ("exit", "exit | quit               - close the session"),
];

/// What the console should do after a command.
#[derive(Debug, Eq, PartialEq)]
pub enum Reply {
    Lines(Vec<String>),
    Exit,
}

/// Emulated oven: the shared core plus host stand-ins for the collaborators.
pub struct Session {
    controller: OvenController<LatchedLedBar>,
    timebase: Timebase,
    flags: EventFlags,
    conditioner: SensorConditioner,
    display: SnapshotLatch,
    transcript: Option<TranscriptLogger>,
    started_at: HostInstant,
    colour: bool,
}

impl Session {
    pub fn new(config: OvenConfig, transcript: Option<&Path>) -> io::Result<Self> {
        let transcript = transcript.map(TranscriptLogger::new).transpose()?;
        let mut controller = OvenController::new(LatchedLedBar::new(), config);
        let mut display = SnapshotLatch::new();
        controller.initialize(&mut display);

        Ok(Self {
            controller,
            timebase: Timebase::new(),
            flags: EventFlags::new(),
            conditioner: SensorConditioner::new(config.sensor),
            display,
            transcript,
            started_at: HostInstant::now(),
            colour: false,
        })
    }

    /// Enables ANSI colouring of the LED bar.
    pub fn with_colour(mut self, colour: bool) -> Self {
        self.colour = colour;
        self
    }

    pub fn snapshot(&self) -> OvenSnapshot {
        self.controller.snapshot()
    }

    pub fn handle_command(&mut self, line: &str) -> io::Result<Reply> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Reply::Lines(Vec::new()));
        }

        let elapsed = self.started_at.elapsed();
        self.log(elapsed, TranscriptRole::Host, trimmed)?;

        let mut lines = Vec::new();
        match parse_command(trimmed) {
            Ok(Command::Exit) => {
                self.log(elapsed, TranscriptRole::Emulator, "session closed")?;
                return Ok(Reply::Exit);
            }
            Ok(Command::Help(topic)) => help_lines(topic, &mut lines),
            Ok(command) => {
                self.apply(command, &mut lines);
                self.describe_panel(&mut lines);
            }
            Err(ScriptError::Empty) => {}
            Err(error) => lines.push(format!("ERR {error}")),
        }

        for line in &lines {
            self.log(elapsed, TranscriptRole::Emulator, line)?;
        }
        Ok(Reply::Lines(lines))
    }

    fn apply(&mut self, command: Command<'_>, lines: &mut Vec<String>) {
        match command {
            Command::Tick(count) => self.advance(count, lines),
            Command::Sample { raw, count } => {
                for _ in 0..count {
                    self.sample(raw, lines);
                }
            }
            Command::Dial(value) => {
                let raw = u16::from(value) << SENSOR_SCALE_SHIFT;
                let renders = self.display.renders();
                for _ in 0..self.conditioner.capacity() {
                    self.sample(raw, lines);
                }
                if self.display.renders() == renders {
                    lines.push(format!("dial {value}: no change reported"));
                }
            }
            Command::Press { button, hold } => {
                self.raise(ButtonEvents::down(button), lines);
                self.advance(hold, lines);
                self.raise(ButtonEvents::up(button), lines);
            }
            Command::Down(button) => self.raise(ButtonEvents::down(button), lines),
            Command::Up(button) => self.raise(ButtonEvents::up(button), lines),
            Command::Status | Command::Help(_) | Command::Exit => {}
        }
    }

    fn advance(&mut self, ticks: u16, lines: &mut Vec<String>) {
        for _ in 0..ticks {
            self.timebase.on_tick();
            self.dispatch(lines);
        }
    }

    fn sample(&mut self, raw: u16, lines: &mut Vec<String>) {
        if let Some(reading) = self.conditioner.on_sample(raw) {
            self.flags.publish_reading(reading);
            self.dispatch(lines);
        }
    }

    fn raise(&mut self, events: ButtonEvents, lines: &mut Vec<String>) {
        self.flags.raise_buttons(events);
        self.dispatch(lines);
    }

    fn dispatch(&mut self, lines: &mut Vec<String>) {
        while let Some(outcome) = dispatch_pending(
            &mut self.controller,
            &self.timebase,
            &self.flags,
            &mut self.display,
        ) {
            if outcome.transitioned() {
                lines.push(format!(
                    "{} {} -> {}",
                    self.timebase.now(),
                    outcome.from,
                    outcome.to
                ));
            }
        }
    }

    fn describe_panel(&self, lines: &mut Vec<String>) {
        let snapshot = self.controller.snapshot();
        lines.extend(
            DisplayFrame(&snapshot)
                .to_string()
                .lines()
                .map(str::to_string),
        );
        lines.push(format!(
            "LED {}  state={} selector={} pacing={} {}",
            led_bar(self.controller.leds().pattern(), self.colour),
            snapshot.state,
            snapshot.selector.label(),
            self.controller.config().pacing.label(),
            self.timebase.now()
        ));
    }

    fn log(&mut self, elapsed: Duration, role: TranscriptRole, line: &str) -> io::Result<()> {
        match self.transcript.as_mut() {
            Some(transcript) => transcript.append_line(elapsed, role, line),
            None => Ok(()),
        }
    }
}

fn help_lines(topic: Option<&str>, lines: &mut Vec<String>) {
    match topic {
        Some(target) => {
            if let Some((_, detail)) = HELP_TOPICS
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(target))
            {
                lines.push((*detail).to_string());
            } else {
                lines.push(format!("No help available for `{target}`."));
                lines.push(format!("Available topics: {}", help_topic_list()));
            }
        }
        None => {
            lines.push("Available commands:".to_string());
            for (_, detail) in HELP_TOPICS {
                lines.push(format!("  {detail}"));
            }
            lines.push("Type `help <topic>` for a specific command.".to_string());
        }
    }
}

fn help_topic_list() -> String {
    HELP_TOPICS
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// LED bar drawn most significant bit first, so LEDs go dark right to left.
fn led_bar(bits: u8, colour: bool) -> String {
    (0..8)
        .rev()
        .map(|index| {
            let lit = bits & (1 << index) != 0;
            match (lit, colour) {
                (true, true) => "#".red().bold().to_string(),
                (false, true) => ".".dark_grey().to_string(),
                (true, false) => "#".to_string(),
                (false, false) => ".".to_string(),
            }
        })
        .collect()
}

struct TranscriptLogger {
    writer: BufWriter<std::fs::File>,
}

impl TranscriptLogger {
    fn new(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut logger = Self {
            writer: BufWriter::new(file),
        };
        logger.write_header()?;
        Ok(logger)
    }

    fn write_header(&mut self) -> io::Result<()> {
        writeln!(self.writer, "# Toaster oven emulator transcript")?;
        writeln!(
            self.writer,
            "# Timestamps are milliseconds since session start"
        )?;
        writeln!(self.writer)?;
        self.writer.flush()
    }

    fn append_line(
        &mut self,
        elapsed: Duration,
        role: TranscriptRole,
        line: &str,
    ) -> io::Result<()> {
        writeln!(
            self.writer,
            "[+{:>6} ms] {} {}",
            elapsed.as_millis(),
            role.prefix(),
            line
        )?;
        self.writer.flush()
    }
}

#[derive(Clone, Copy)]
enum TranscriptRole {
    Host,
    Emulator,
}

impl TranscriptRole {
    fn prefix(self) -> &'static str {
        match self {
            TranscriptRole::Host => "HOST>",
            TranscriptRole::Emulator => "EMU <",
        }
    }
}

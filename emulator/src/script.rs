//! Console command grammar.
//!
//! Lines are parsed with `winnow` into raw numeric fields first and checked
//! against the board's ranges afterwards, so a syntax error and an
//! out-of-range value are reported differently.

use std::fmt;

use oven_core::buttons::Button;
use winnow::ascii::{Caseless, dec_uint, space1};
use winnow::combinator::{alt, opt, preceded};
use winnow::prelude::*;
use winnow::token::take_while;

/// Largest raw sample the 12-bit ADC produces.
pub const ADC_MAX: u16 = 4_095;

/// A validated console command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command<'a> {
    Tick(u16),
    Sample { raw: u16, count: u16 },
    Dial(u8),
    Press { button: Button, hold: u16 },
    Down(Button),
    Up(Button),
    Status,
    Help(Option<&'a str>),
    Exit,
}

/// Reasons a console line is rejected.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScriptError {
    Empty,
    Syntax { offset: usize },
    OutOfRange { field: &'static str, value: u32, max: u32 },
    UnknownButton(u32),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Empty => f.write_str("empty command"),
            ScriptError::Syntax { offset } => write!(f, "unexpected input at column {}", offset + 1),
            ScriptError::OutOfRange { field, value, max } => {
                write!(f, "{field} {value} is out of range (max {max})")
            }
            ScriptError::UnknownButton(number) => {
                write!(f, "no button {number}; the panel has buttons 3 and 4")
            }
        }
    }
}

impl std::error::Error for ScriptError {}

#[derive(Clone, Copy, Debug)]
enum Raw<'a> {
    Tick(Option<u32>),
    Sample(u32, Option<u32>),
    Dial(u32),
    Press(u32, Option<u32>),
    Down(u32),
    Up(u32),
    Status,
    Help(Option<&'a str>),
    Exit,
}

/// Parses and validates one console line.
///
/// # Errors
///
/// Returns [`ScriptError`] when the line is blank, malformed or carries a
/// value the board cannot produce.
pub fn parse_command(line: &str) -> Result<Command<'_>, ScriptError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(ScriptError::Empty);
    }

    let raw = command
        .parse(trimmed)
        .map_err(|error| ScriptError::Syntax {
            offset: error.offset(),
        })?;
    validate(raw)
}

fn command<'a>(input: &mut &'a str) -> ModalResult<Raw<'a>> {
    alt((tick, sample, dial, press, down, up, status, help, exit)).parse_next(input)
}

fn argument(input: &mut &str) -> ModalResult<u32> {
    preceded(space1, dec_uint).parse_next(input)
}

fn tick<'a>(input: &mut &'a str) -> ModalResult<Raw<'a>> {
    preceded(Caseless("tick"), opt(argument))
        .map(Raw::Tick)
        .parse_next(input)
}

fn sample<'a>(input: &mut &'a str) -> ModalResult<Raw<'a>> {
    preceded(Caseless("sample"), (argument, opt(argument)))
        .map(|(raw, count)| Raw::Sample(raw, count))
        .parse_next(input)
}

fn dial<'a>(input: &mut &'a str) -> ModalResult<Raw<'a>> {
    preceded(Caseless("dial"), argument)
        .map(Raw::Dial)
        .parse_next(input)
}

fn press<'a>(input: &mut &'a str) -> ModalResult<Raw<'a>> {
    let hold = preceded((space1, Caseless("hold"), '='), dec_uint);
    preceded(Caseless("press"), (argument, opt(hold)))
        .map(|(button, hold)| Raw::Press(button, hold))
        .parse_next(input)
}

fn down<'a>(input: &mut &'a str) -> ModalResult<Raw<'a>> {
    preceded(Caseless("down"), argument)
        .map(Raw::Down)
        .parse_next(input)
}

fn up<'a>(input: &mut &'a str) -> ModalResult<Raw<'a>> {
    preceded(Caseless("up"), argument)
        .map(Raw::Up)
        .parse_next(input)
}

fn status<'a>(input: &mut &'a str) -> ModalResult<Raw<'a>> {
    Caseless("status").value(Raw::Status).parse_next(input)
}

fn help<'a>(input: &mut &'a str) -> ModalResult<Raw<'a>> {
    let topic = preceded(space1, take_while(1.., |c: char| !c.is_whitespace()));
    preceded(Caseless("help"), opt(topic))
        .map(Raw::Help)
        .parse_next(input)
}

fn exit<'a>(input: &mut &'a str) -> ModalResult<Raw<'a>> {
    alt((Caseless("exit"), Caseless("quit")))
        .value(Raw::Exit)
        .parse_next(input)
}

fn validate(raw: Raw<'_>) -> Result<Command<'_>, ScriptError> {
    let command = match raw {
        Raw::Tick(count) => Command::Tick(repeat("tick count", count)?),
        Raw::Sample(raw, count) => Command::Sample {
            raw: bounded("sample", raw, u32::from(ADC_MAX))?,
            count: repeat("sample count", count)?,
        },
        Raw::Dial(value) => {
            let value = bounded("dial", value, u32::from(u8::MAX))?;
            Command::Dial(u8::try_from(value).unwrap_or(u8::MAX))
        }
        Raw::Press(button, hold) => Command::Press {
            button: button_from(button)?,
            hold: repeat("hold", hold)?,
        },
        Raw::Down(button) => Command::Down(button_from(button)?),
        Raw::Up(button) => Command::Up(button_from(button)?),
        Raw::Status => Command::Status,
        Raw::Help(topic) => Command::Help(topic),
        Raw::Exit => Command::Exit,
    };
    Ok(command)
}

fn bounded(field: &'static str, value: u32, max: u32) -> Result<u16, ScriptError> {
    if value > max {
        return Err(ScriptError::OutOfRange { field, value, max });
    }
    u16::try_from(value).map_err(|_| ScriptError::OutOfRange { field, value, max })
}

/// Repeat counts default to one and are limited to the tick counter width.
fn repeat(field: &'static str, value: Option<u32>) -> Result<u16, ScriptError> {
    bounded(field, value.unwrap_or(1), u32::from(u16::MAX))
}

fn button_from(number: u32) -> Result<Button, ScriptError> {
    u8::try_from(number)
        .ok()
        .and_then(Button::from_number)
        .ok_or(ScriptError::UnknownButton(number))
}

//! Interrupt-to-loop handoff.
//!
//! Producers (button scan, sensor sampling, the tick source) run in
//! interrupt or task context and only ever set bits. The single consumer
//! snapshots everything pending with [`EventFlags::peek`], runs the state
//! machine once, and only then calls [`EventFlags::acknowledge`] with the
//! same snapshot. Acknowledging clears exactly what was observed, so an
//! event raised while the controller was running is kept for the next pass.

use portable_atomic::{AtomicU8, AtomicU32, Ordering};

use crate::buttons::ButtonEvents;
use crate::oven::OvenInputs;
use crate::sensor::StableReading;
use crate::timebase::{Ticks, Timebase};

const READING_VALID: u32 = 1 << 31;

/// Pending inputs plus the raw reading word they were decoded from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PendingInputs {
    pub inputs: OvenInputs,
    pub now: Ticks,
    reading_word: u32,
}

/// Lock-free single-consumer event flags.
pub struct EventFlags {
    buttons: AtomicU8,
    reading: AtomicU32,
}

impl EventFlags {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buttons: AtomicU8::new(0),
            reading: AtomicU32::new(0),
        }
    }

    /// Merges newly detected button edges into the pending mask.
    pub fn raise_buttons(&self, events: ButtonEvents) {
        if !events.is_empty() {
            self.buttons.fetch_or(events.bits(), Ordering::AcqRel);
        }
    }

    /// Publishes a stable reading. The payload and its valid bit live in one
    /// word, so the consumer can never see the flag without the value.
    pub fn publish_reading(&self, reading: StableReading) {
        self.reading.store(encode_reading(reading), Ordering::Release);
    }

    /// Snapshots every pending input without clearing anything.
    #[must_use]
    pub fn peek(&self, timebase: &Timebase) -> PendingInputs {
        let reading_word = self.reading.load(Ordering::Acquire);
        let (now, tick) = timebase.observe();
        let inputs = OvenInputs {
            tick,
            buttons: ButtonEvents::from_bits(self.buttons.load(Ordering::Acquire)),
            reading: decode_reading(reading_word),
        };
        PendingInputs {
            inputs,
            now,
            reading_word,
        }
    }

    /// Clears what `pending` observed. Must run after the controller step
    /// that consumed `pending` has completed.
    pub fn acknowledge(&self, pending: &PendingInputs, timebase: &Timebase) {
        let observed = pending.inputs.buttons.bits();
        if observed != 0 {
            self.buttons.fetch_and(!observed, Ordering::AcqRel);
        }
        if pending.inputs.reading.is_some() {
            // A newer reading published meanwhile stays pending.
            let _ = self.reading.compare_exchange(
                pending.reading_word,
                0,
                Ordering::AcqRel,
                Ordering::Acquire,
            );
        }
        if pending.inputs.tick {
            timebase.acknowledge_tick(pending.now);
        }
    }
}

impl Default for EventFlags {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_reading(reading: StableReading) -> u32 {
    READING_VALID | (u32::from(reading.scaled) << 16) | u32::from(reading.average)
}

fn decode_reading(word: u32) -> Option<StableReading> {
    if word & READING_VALID == 0 {
        return None;
    }
    let [_, scaled, high, low] = word.to_be_bytes();
    Some(StableReading {
        average: u16::from_be_bytes([high, low]),
        scaled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(average: u16) -> StableReading {
        StableReading::from_average(average, 4)
    }

    #[test]
    fn nothing_pending_by_default() {
        let timebase = Timebase::new();
        let flags = EventFlags::new();
        let pending = flags.peek(&timebase);
        assert!(!pending.inputs.any());
        assert_eq!(pending.now, Ticks::ZERO);
    }

    #[test]
    fn peek_collects_every_source() {
        let timebase = Timebase::new();
        let flags = EventFlags::new();

        timebase.on_tick();
        flags.raise_buttons(ButtonEvents::THREE_DOWN);
        flags.publish_reading(reading(4_095));

        let pending = flags.peek(&timebase);
        assert!(pending.inputs.tick);
        assert_eq!(pending.inputs.buttons, ButtonEvents::THREE_DOWN);
        assert_eq!(pending.inputs.reading, Some(reading(4_095)));
        assert_eq!(pending.now, Ticks::new(1));

        flags.acknowledge(&pending, &timebase);
        assert!(!flags.peek(&timebase).inputs.any());
    }

    #[test]
    fn events_raised_during_a_step_survive_acknowledge() {
        let timebase = Timebase::new();
        let flags = EventFlags::new();

        flags.raise_buttons(ButtonEvents::FOUR_DOWN);
        flags.publish_reading(reading(800));
        let pending = flags.peek(&timebase);

        // Producers run again before the consumer acknowledges.
        flags.raise_buttons(ButtonEvents::FOUR_UP);
        flags.publish_reading(reading(1_600));

        flags.acknowledge(&pending, &timebase);

        let next = flags.peek(&timebase);
        assert_eq!(next.inputs.buttons, ButtonEvents::FOUR_UP);
        assert_eq!(next.inputs.reading, Some(reading(1_600)));
    }

    #[test]
    fn tick_counted_during_a_step_survives_acknowledge() {
        let timebase = Timebase::new();
        let flags = EventFlags::new();

        timebase.on_tick();
        let pending = flags.peek(&timebase);
        assert!(pending.inputs.tick);

        timebase.on_tick();
        flags.acknowledge(&pending, &timebase);

        let next = flags.peek(&timebase);
        assert!(next.inputs.tick);
        assert_eq!(next.now, Ticks::new(2));

        flags.acknowledge(&next, &timebase);
        assert!(!flags.peek(&timebase).inputs.tick);
    }

    #[test]
    fn reading_payload_round_trips_through_the_word() {
        let original = reading(0x0ABC);
        assert_eq!(decode_reading(encode_reading(original)), Some(original));
        assert_eq!(decode_reading(0x00AB_0ABC), None);
    }
}

//! Telemetry ring buffer and logging helpers.
//!
//! Keeps the most recent controller state transitions, stamped with the tick
//! they happened on and the ticks spent in the previous state, and mirrors
//! each one to defmt (or stdout on the host) as it is recorded.

use heapless::HistoryBuf;
use oven_core::oven::{CookMode, OvenState, StepOutcome};
use oven_core::timebase::Ticks;

/// Total number of telemetry entries retained in memory.
pub const TELEMETRY_RING_CAPACITY: usize = 32;

/// Monotonic identifier assigned to each record.
pub type EventId = u32;

/// Telemetry ring buffer type alias.
pub type TelemetryRing = HistoryBuf<TelemetryRecord, TELEMETRY_RING_CAPACITY>;

/// One recorded state transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TelemetryRecord {
    pub id: EventId,
    pub at: Ticks,
    pub from: OvenState,
    pub to: OvenState,
    pub mode: CookMode,
    pub time_remaining: u16,
    /// Ticks since the previous recorded transition.
    pub elapsed_since_previous: Option<u16>,
}

/// Records controller transitions into a fixed-size ring buffer.
pub struct TelemetryRecorder {
    ring: TelemetryRing,
    last_transition_at: Option<Ticks>,
    next_event_id: EventId,
}

impl TelemetryRecorder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ring: HistoryBuf::new(),
            last_transition_at: None,
            next_event_id: 0,
        }
    }

    /// Recorded transitions in chronological order.
    pub fn oldest_first(&self) -> impl Iterator<Item = &TelemetryRecord> {
        self.ring.oldest_ordered()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&TelemetryRecord> {
        self.ring.recent()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Records `outcome` when it changed state. Steps that stayed put are
    /// not recorded and return `None`.
    pub fn record_step(
        &mut self,
        outcome: &StepOutcome,
        mode: CookMode,
        time_remaining: u16,
        at: Ticks,
    ) -> Option<EventId> {
        if !outcome.transitioned() {
            return None;
        }

        let elapsed = self
            .last_transition_at
            .map(|previous| at.wrapping_since(previous));
        self.last_transition_at = Some(at);

        let id = self.next_event_id;
        self.next_event_id = self.next_event_id.wrapping_add(1);

        self.ring.write(TelemetryRecord {
            id,
            at,
            from: outcome.from,
            to: outcome.to,
            mode,
            time_remaining,
            elapsed_since_previous: elapsed,
        });
        emit_log(
            outcome.from.label(),
            outcome.to.label(),
            at.as_u16(),
            elapsed,
        );
        Some(id)
    }
}

impl Default for TelemetryRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_os = "none")]
fn emit_log(from: &'static str, to: &'static str, tick: u16, elapsed: Option<u16>) {
    if let Some(delta) = elapsed {
        defmt::info!("telemetry:oven {} -> {} t={} Δ={}", from, to, tick, delta);
    } else {
        defmt::info!("telemetry:oven {} -> {} t={}", from, to, tick);
    }
}

#[cfg(not(target_os = "none"))]
fn emit_log(from: &'static str, to: &'static str, tick: u16, elapsed: Option<u16>) {
    if let Some(delta) = elapsed {
        println!("telemetry:oven {from} -> {to} t={tick} Δ={delta}");
    } else {
        println!("telemetry:oven {from} -> {to} t={tick}");
    }
}

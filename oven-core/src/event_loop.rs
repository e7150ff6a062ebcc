//! Run-to-completion service routine tying the handoff to the controller.

use crate::display::OvenDisplay;
use crate::handoff::EventFlags;
use crate::oven::{OvenController, StepOutcome};
use crate::progress::LedBar;
use crate::timebase::Timebase;

/// Services every input pending right now with a single controller step.
///
/// Returns `None` without touching the controller when nothing is pending.
/// Flags are acknowledged only after the step (and any display refresh)
/// has completed, so producers that fire in the meantime are not lost.
pub fn dispatch_pending<L, D>(
    controller: &mut OvenController<L>,
    timebase: &Timebase,
    flags: &EventFlags,
    display: &mut D,
) -> Option<StepOutcome>
where
    L: LedBar,
    D: OvenDisplay + ?Sized,
{
    let pending = flags.peek(timebase);
    if !pending.inputs.any() {
        return None;
    }

    let outcome = controller.step(&pending.inputs, pending.now);
    if outcome.refresh_display {
        display.render(&controller.snapshot());
    }

    flags.acknowledge(&pending, timebase);
    Some(outcome)
}

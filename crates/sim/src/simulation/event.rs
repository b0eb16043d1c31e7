use thumper_core::Snapshot;
use uom::si::f64::Time;

use crate::{
    dashboard::Dashboard,
    physics::{TickInput, TickOutput},
    state::DrivetrainState,
};

/// Event emitted by [`run`](super::run) for each committed state.
///
/// Step 0 is the state before any integration and carries no tick.
/// Steps 1..N are emitted after each tick commits.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// The step number (0 for initial, 1..N for ticks).
    pub step: usize,

    /// Session clock after this step.
    pub time: Time,

    /// The tick that produced this step, absent for step 0.
    pub tick: Option<Snapshot<TickInput, TickOutput>>,

    /// Display values after this step.
    pub dashboard: Dashboard,
}

impl Event {
    /// The committed state after this step, if a tick ran.
    #[must_use]
    pub fn state(&self) -> Option<&DrivetrainState> {
        self.tick.as_ref().map(|tick| &tick.output.state)
    }

    /// Returns `true` if the engine stalled during this step.
    #[must_use]
    pub fn stalled(&self) -> bool {
        self.tick.as_ref().is_some_and(|tick| tick.output.stalled)
    }
}

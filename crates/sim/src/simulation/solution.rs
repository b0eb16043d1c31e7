use thumper_core::Snapshot;

use crate::physics::{TickInput, TickOutput};

/// Indicates how a run terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Completed all requested steps.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// The result of a fixed-step run.
#[derive(Debug, Clone)]
pub struct Solution {
    /// How the run terminated.
    pub status: Status,

    /// Every committed tick, in order.
    pub history: Vec<Snapshot<TickInput, TickOutput>>,

    /// Number of ticks committed.
    pub steps: usize,
}

impl Solution {
    /// The last committed tick, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Snapshot<TickInput, TickOutput>> {
        self.history.last()
    }
}

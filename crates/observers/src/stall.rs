use thumper_core::Observer;

use crate::traits::{CanStopEarly, HasTelemetry};

/// Stops a run at the first stall.
///
/// Records when the stall happened so a scripted ride can report it.
#[derive(Debug, Clone, Default)]
pub struct StopOnStall {
    stalled_at: Option<f64>,
}

impl StopOnStall {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulation time of the stall in seconds, if one was seen.
    #[must_use]
    pub fn stalled_at(&self) -> Option<f64> {
        self.stalled_at
    }
}

impl<E: HasTelemetry, A: CanStopEarly> Observer<E, A> for StopOnStall {
    fn observe(&mut self, event: &E) -> Option<A> {
        if !event.stalled() {
            return None;
        }
        self.stalled_at.get_or_insert(event.seconds());
        Some(A::stop_early())
    }
}

impl<E: HasTelemetry, A: CanStopEarly> Observer<E, A> for &mut StopOnStall {
    fn observe(&mut self, event: &E) -> Option<A> {
        (*self).observe(event)
    }
}

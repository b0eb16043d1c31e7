use thumper_core::Observer;
use tracing::{debug, info};

use crate::traits::HasTelemetry;

/// Logs telemetry through `tracing` every `every` events.
///
/// Stalls are always logged. The observer never stops a run.
#[derive(Debug, Clone)]
pub struct TraceObserver {
    every: usize,
    seen: usize,
}

impl TraceObserver {
    /// Creates an observer that logs every `every`-th event, starting with the
    /// first. A period of zero is treated as one.
    #[must_use]
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
            seen: 0,
        }
    }

    /// Number of events observed so far.
    #[must_use]
    pub fn seen(&self) -> usize {
        self.seen
    }

    fn is_due(&self) -> bool {
        self.seen % self.every == 0
    }
}

impl Default for TraceObserver {
    /// Logs once per second at 60 frames per second.
    fn default() -> Self {
        Self::new(60)
    }
}

impl<E: HasTelemetry, A> Observer<E, A> for TraceObserver {
    fn observe(&mut self, event: &E) -> Option<A> {
        let dash = event.dashboard();

        if event.stalled() {
            info!(t = event.seconds(), gear = %dash.gear, "stall");
        }
        if self.is_due() {
            debug!(
                t = event.seconds(),
                rpm = dash.rpm,
                speed_kmh = dash.speed_kmh,
                gear = %dash.gear,
                clutch = dash.clutch.get(),
                throttle = dash.throttle.get(),
                brake = dash.brake,
                warning = dash.warning,
                "telemetry"
            );
        }

        self.seen += 1;
        None
    }
}

impl<E: HasTelemetry, A> Observer<E, A> for &mut TraceObserver {
    fn observe(&mut self, event: &E) -> Option<A> {
        (*self).observe(event)
    }
}

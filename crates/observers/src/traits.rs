//! Capability traits for reusable ride observers.
//!
//! These traits abstract over scheduler-specific event and action types, so an
//! observer written once works with any run that reports drivetrain telemetry.
//!
//! # Event traits
//!
//! - [`HasTelemetry`]: events that carry the dashboard after a tick
//!
//! # Action traits
//!
//! - [`CanStopEarly`]: actions that can signal early termination
//!
//! # Example
//!
//! ```rust
//! use thumper_core::Observer;
//! use thumper_observers::traits::{CanStopEarly, HasTelemetry};
//!
//! struct StopAtSpeed {
//!     kmh: u32,
//! }
//!
//! impl<E: HasTelemetry, A: CanStopEarly> Observer<E, A> for StopAtSpeed {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         (event.dashboard().speed_kmh >= self.kmh).then(A::stop_early)
//!     }
//! }
//! ```

use thumper_sim::{dashboard::Dashboard, simulation};
use uom::si::time::second;

/// An event that carries drivetrain telemetry.
pub trait HasTelemetry {
    /// Simulation time of the event, in seconds.
    fn seconds(&self) -> f64;

    /// Display values after the event.
    fn dashboard(&self) -> &Dashboard;

    /// Returns `true` if the engine stalled in the tick behind this event.
    fn stalled(&self) -> bool;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the run early.
    fn stop_early() -> Self;
}

impl HasTelemetry for simulation::Event {
    fn seconds(&self) -> f64 {
        self.time.get::<second>()
    }

    fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    fn stalled(&self) -> bool {
        simulation::Event::stalled(self)
    }
}

impl CanStopEarly for simulation::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

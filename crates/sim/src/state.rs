use thumper_core::Fraction;
use uom::si::{
    f64::Velocity,
    velocity::{kilometer_per_hour, meter_per_second},
};

use crate::gear::Gear;

/// The mutable simulation vector of the drivetrain.
///
/// Created once per session and replaced wholesale by each physics tick.
/// Invariants maintained by the tick:
///
/// - `rpm` stays within `[0, max_rpm]`.
/// - `speed` is never negative.
/// - `brake_pressure` ramps toward one while the brake is held and drops to
///   zero on release.
///
/// `gear` only changes through the [`Gearbox`](crate::shift::Gearbox).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrivetrainState {
    pub rpm: f64,
    pub speed: Velocity,
    pub gear: Gear,
    pub brake_pressure: Fraction,
    pub engine_on: bool,
}

impl DrivetrainState {
    /// A bike at rest in neutral with the engine off.
    #[must_use]
    pub fn parked() -> Self {
        Self {
            rpm: 0.0,
            speed: Velocity::new::<meter_per_second>(0.0),
            gear: Gear::Neutral,
            brake_pressure: Fraction::ZERO,
            engine_on: false,
        }
    }

    /// Returns `self` with the given rpm, keeping other fields unchanged.
    #[must_use]
    pub fn with_rpm(self, rpm: f64) -> Self {
        Self { rpm, ..self }
    }

    /// Returns `self` with the given speed, keeping other fields unchanged.
    #[must_use]
    pub fn with_speed(self, speed: Velocity) -> Self {
        Self { speed, ..self }
    }

    /// Returns `self` with the given gear, keeping other fields unchanged.
    #[must_use]
    pub fn with_gear(self, gear: Gear) -> Self {
        Self { gear, ..self }
    }

    /// Returns `self` with the given engine state, keeping other fields unchanged.
    #[must_use]
    pub fn with_engine_on(self, engine_on: bool) -> Self {
        Self { engine_on, ..self }
    }

    /// Road speed in kilometres per hour, unrounded.
    #[must_use]
    pub fn speed_kmh(&self) -> f64 {
        self.speed.get::<kilometer_per_hour>()
    }
}

impl Default for DrivetrainState {
    fn default() -> Self {
        Self::parked()
    }
}

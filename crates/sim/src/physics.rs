//! Per-frame longitudinal dynamics of the bike.
//!
//! [`Physics::tick`] advances a [`DrivetrainState`] by one time step. It is a
//! pure function of the previous committed state, the rider [`Controls`], and
//! the step size, and it cannot fail.
//!
//! A tick runs in this order:
//!
//! 1. Ramp brake pressure and derive the brake force.
//! 2. Compute the no-load target rpm from the throttle.
//! 3. Compute clutch friction from lever travel.
//! 4. Compute aerodynamic and rolling drag.
//! 5. Compute the drive force from the torque curve and gear ratio.
//! 6. Integrate speed from the net force.
//! 7. Update rpm in one of three regimes (engine off, free-revving, clutch-coupled).
//! 8. Stall the engine when the clutch is dropped at a standstill without throttle.
//! 9. Clamp rpm to the configured range.

use std::{convert::Infallible, f64::consts::PI};

use thumper_core::{Fraction, Model};
use uom::si::{
    f64::{Time, Velocity},
    force::newton,
    length::meter,
    mass::kilogram,
    time::second,
    velocity::meter_per_second,
};

use crate::{
    config::{BikeConfig, ConfigError},
    controls::Controls,
    state::DrivetrainState,
};

/// Air density used by the drag model, in kg/m³.
pub const AIR_DENSITY: f64 = 1.2;

/// Linear rolling resistance, in N per m/s.
pub const ROLLING_RESISTANCE: f64 = 5.0;

/// Engine torque at the peak of the torque curve with the throttle wide open, in N·m.
pub const PEAK_TORQUE: f64 = 200.0;

/// Brake pressure gained per second while the brake is held.
pub const BRAKE_RAMP_RATE: f64 = 0.8;

/// Rpm lost per second with the engine off.
pub const ENGINE_OFF_DECAY: f64 = 1_500.0;

/// Rate constant of the first-order lag toward the no-load rpm, per second.
pub const FREE_REV_RATE: f64 = 5.0;

/// Below this lever travel the clutch is fully engaged.
pub const CLUTCH_ENGAGED_BELOW: f64 = 0.1;

/// Above this lever travel the clutch is fully disengaged.
pub const CLUTCH_DISENGAGED_ABOVE: f64 = 0.8;

/// Clutch friction above which the engine is rigidly coupled for stall purposes.
pub const STALL_FRICTION: f64 = 0.8;

/// Throttle below which a coupled engine at a standstill stalls.
pub const STALL_THROTTLE: f64 = 0.1;

/// Road speed below which a coupled engine without throttle stalls, in m/s.
pub const STALL_SPEED: f64 = 1.0;

/// Input to a physics tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    pub state: DrivetrainState,
    pub controls: Controls,
    pub dt: Time,
}

/// Longitudinal forces acting on the bike during a tick, in newtons.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Forces {
    /// Force at the contact patch before clutch slip.
    pub drive: f64,
    pub drag: f64,
    pub brake: f64,
    /// `drive · friction − drag − brake`.
    pub net: f64,
}

/// Result of a physics tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    /// The new committed state.
    pub state: DrivetrainState,
    pub forces: Forces,
    pub clutch_friction: Fraction,
    /// `true` if the engine stalled during this tick.
    pub stalled: bool,
}

/// The drivetrain model for one bike.
///
/// Holds a validated [`BikeConfig`] and advances state with [`Physics::tick`].
#[derive(Debug, Clone, PartialEq)]
pub struct Physics {
    config: BikeConfig,
}

impl Physics {
    /// Creates the model from a config.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the config fails [`BikeConfig::validate`].
    pub fn new(config: BikeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &BikeConfig {
        &self.config
    }

    /// Advances `state` by `dt`.
    ///
    /// A negative or `NaN` step is treated as zero. A zero step leaves speed
    /// and rpm unchanged apart from the clutch-coupled regime, where rpm
    /// snaps to its blended target, and releases the brake pressure if the
    /// brake is not held.
    #[must_use]
    pub fn tick(&self, state: &DrivetrainState, controls: &Controls, dt: Time) -> TickOutput {
        let config = &self.config;
        let dt = dt.get::<second>().max(0.0);
        let speed = state.speed.get::<meter_per_second>();
        let ratio = config.gear_ratios.ratio(state.gear);
        let in_gear = !state.gear.is_neutral();
        let radius = config.wheel_radius.get::<meter>();

        let brake_pressure = ramp_brake_pressure(state.brake_pressure, controls.brake, dt);
        let brake = brake_pressure * config.brake_max_force.get::<newton>();

        let target = no_load_rpm(config, state.engine_on, controls.throttle);
        let friction = clutch_friction(controls.clutch);
        let drag = drag_force(config.drag_coefficient, speed);

        let drive = if in_gear && state.engine_on {
            let torque =
                torque_curve(state.rpm, config.max_rpm) * PEAK_TORQUE * controls.throttle;
            torque * ratio / radius
        } else {
            0.0
        };

        let net = drive * friction - drag - brake;
        let next_speed = (speed + net / config.bike_mass.get::<kilogram>() * dt).max(0.0);

        let rpm = if !state.engine_on {
            state.rpm - ENGINE_OFF_DECAY * dt
        } else if !in_gear || controls.clutch.get() > CLUTCH_DISENGAGED_ABOVE {
            state.rpm + (target - state.rpm) * dt * FREE_REV_RATE
        } else {
            let wheel = wheel_rpm(next_speed, ratio, radius);
            target * friction.complement() + wheel * friction
        };

        let stalled = state.engine_on
            && in_gear
            && friction.get() > STALL_FRICTION
            && next_speed < STALL_SPEED
            && controls.throttle.get() < STALL_THROTTLE;

        let rpm = if stalled { 0.0 } else { rpm.clamp(0.0, config.max_rpm) };

        TickOutput {
            state: DrivetrainState {
                rpm,
                speed: Velocity::new::<meter_per_second>(next_speed),
                gear: state.gear,
                brake_pressure,
                engine_on: state.engine_on && !stalled,
            },
            forces: Forces {
                drive,
                drag,
                brake,
                net,
            },
            clutch_friction: friction,
            stalled,
        }
    }
}

impl Model for Physics {
    type Input = TickInput;
    type Output = TickOutput;
    type Error = Infallible;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        Ok(self.tick(&input.state, &input.controls, input.dt))
    }
}

/// Brake pressure after `dt` seconds: ramps up while held, drops to zero on release.
#[must_use]
pub fn ramp_brake_pressure(pressure: Fraction, held: bool, dt: f64) -> Fraction {
    if held {
        Fraction::clamped(pressure.get() + dt * BRAKE_RAMP_RATE)
    } else {
        Fraction::ZERO
    }
}

/// Rpm the engine would settle at if disconnected from the wheel.
///
/// Zero with the engine off; otherwise linear in throttle from idle to the
/// rpm ceiling.
#[must_use]
pub fn no_load_rpm(config: &BikeConfig, engine_on: bool, throttle: Fraction) -> f64 {
    if engine_on {
        config.idle_rpm + throttle * (config.max_rpm - config.idle_rpm)
    } else {
        0.0
    }
}

/// Fraction of engine torque transmitted through the clutch.
///
/// Lever released (`< 0.1`) is fully engaged, lever pulled past `0.8` is fully
/// slipping, and travel in between transmits `1 − clutch`.
#[must_use]
pub fn clutch_friction(clutch: Fraction) -> Fraction {
    let travel = clutch.get();
    if travel < CLUTCH_ENGAGED_BELOW {
        Fraction::ONE
    } else if travel > CLUTCH_DISENGAGED_ABOVE {
        Fraction::ZERO
    } else {
        clutch.complement()
    }
}

/// Aerodynamic plus rolling drag at `speed` m/s, in newtons.
#[must_use]
pub fn drag_force(drag_coefficient: f64, speed: f64) -> f64 {
    0.5 * drag_coefficient * AIR_DENSITY * speed * speed + speed * ROLLING_RESISTANCE
}

/// Normalized torque at `rpm`: a single hump that vanishes at zero and at
/// `max_rpm` and peaks halfway.
#[must_use]
pub fn torque_curve(rpm: f64, max_rpm: f64) -> f64 {
    (rpm / max_rpm * PI).sin()
}

/// Engine rpm implied by road speed with the clutch locked.
#[must_use]
pub fn wheel_rpm(speed: f64, ratio: f64, wheel_radius: f64) -> f64 {
    let circumference = 2.0 * PI * wheel_radius;
    speed / circumference * 60.0 * ratio
}

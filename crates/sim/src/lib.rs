//! Drivetrain physics for a single-cylinder motorcycle dashboard.
//!
//! The simulation advances one tick per display frame. Each tick reads the
//! rider's controls (clutch, throttle, brake), couples the engine to the rear
//! wheel through the selected gear and a slipping clutch, integrates road
//! speed, and publishes rounded values for the gauges and parameters for the
//! engine sound.
//!
//! # Modules
//!
//! - [`config`]: bike constants and their validation
//! - [`gear`], [`shift`]: the gearbox and its clutch-gated shift machine
//! - [`state`], [`controls`]: committed drivetrain state and rider input
//! - [`physics`]: the per-tick integrator
//! - [`audio`]: engine sound mapping and the audio capability
//! - [`warning`]: the transient advisory banner
//! - [`dashboard`]: display values
//! - [`session`]: one ride, tying the pieces together
//! - [`simulation`]: deterministic fixed-step runs with observers
//! - [`frame_loop`]: host-driven frames with cancellation

pub mod audio;
pub mod config;
pub mod controls;
pub mod dashboard;
pub mod frame_loop;
pub mod gear;
pub mod physics;
pub mod session;
pub mod shift;
pub mod simulation;
pub mod state;
pub mod warning;

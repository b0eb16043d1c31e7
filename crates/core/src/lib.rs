//! Core traits and types for the thumper simulator.
//!
//! This crate defines the shared abstractions the simulation and observer
//! crates build on:
//!
//! - [`Model`]: a callable that maps a typed input to a typed output
//! - [`Snapshot`]: a captured input/output pair from a model call
//! - [`Observer`]: receives scheduler events and optionally returns control actions
//! - [`Fraction`]: a bounded scalar in `[0, 1]` used for control positions

mod fraction;
mod model;
mod observer;

pub use fraction::{Fraction, FractionError};
pub use model::{Model, Snapshot};
pub use observer::Observer;

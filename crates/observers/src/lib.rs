//! Reusable observers for thumper ride simulations.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work with any run reporting drivetrain telemetry.
//!
//! # Modules
//!
//! - [`traits`]: capability traits ([`HasTelemetry`], [`CanStopEarly`])
//!
//! # Observers
//!
//! - [`TraceObserver`] logs telemetry through `tracing` every N events.
//! - [`StopOnStall`] stops a run at the first stall.
//!
//! # Features
//!
//! - `plot`: enables [`PlotObserver`] for charting a ride via egui.
//!   This feature adds dependencies on `eframe` and `egui_plot`.
//!
//! [`Observer`]: thumper_core::Observer
//! [`HasTelemetry`]: traits::HasTelemetry
//! [`CanStopEarly`]: traits::CanStopEarly

pub mod traits;

mod stall;
mod trace;

#[cfg(feature = "plot")]
mod plot;

pub use stall::StopOnStall;
pub use trace::TraceObserver;

#[cfg(feature = "plot")]
pub use plot::{PlotObserver, Plottable, ShowConfig};

//! Plotting observer for visualizing a ride.
//!
//! See [`PlotObserver`] and [`Plottable`] for usage.

use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use thumper_core::Observer;
use thumper_sim::simulation;

use crate::traits::HasTelemetry;

/// Configuration for rendering a [`PlotObserver`] result.
///
/// Construct with [`ShowConfig::new`] and chain builder methods as needed.
///
/// # Example
///
/// ```ignore
/// obs.show(ShowConfig::new().title("Launch in first").legend())?;
/// ```
pub struct ShowConfig {
    title: Option<String>,
    legend: bool,
}

impl ShowConfig {
    /// Creates a new `ShowConfig` with defaults: no title, no legend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: None,
            legend: false,
        }
    }

    /// Sets the window title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Enables a legend labeling each trace by name.
    #[must_use]
    pub fn legend(mut self) -> Self {
        self.legend = true;
        self
    }
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts plottable data from a run event.
///
/// Return `None` from [`x`][Plottable::x] to skip the event entirely; return
/// `None` in a trace slot to skip that trace for the event.
///
/// Scheduler events plot as `[rpm / 100, speed in km/h]` against time, which
/// keeps both traces on a similar scale.
pub trait Plottable<const N: usize> {
    /// The x-axis value for this event, or `None` to skip recording entirely.
    fn x(&self) -> Option<f64>;

    /// The y-axis values for each trace.
    fn traces(&self) -> [Option<f64>; N];
}

impl Plottable<2> for simulation::Event {
    fn x(&self) -> Option<f64> {
        Some(self.seconds())
    }

    fn traces(&self) -> [Option<f64>; 2] {
        let dash = self.dashboard();
        [
            Some(f64::from(dash.rpm) / 100.0),
            Some(f64::from(dash.speed_kmh)),
        ]
    }
}

/// An observer that collects trace data during a run and displays it via egui.
///
/// The const generic `N` is the number of traces. Either pass
/// `&mut PlotObserver` as the run's observer for [`Plottable`] events, or
/// call [`record`][PlotObserver::record] from a closure for custom traces.
///
/// # Example
///
/// ```ignore
/// let mut obs = PlotObserver::<2>::new(["rpm / 100", "km/h"]);
/// simulation::run(&mut session, stepping, &mut obs);
/// obs.show(ShowConfig::new().title("Launch").legend())?;
/// ```
pub struct PlotObserver<const N: usize> {
    names: [String; N],
    data: [Vec<[f64; 2]>; N],
}

impl<const N: usize> PlotObserver<N> {
    /// Creates a new `PlotObserver` with the given trace names.
    pub fn new(names: [&str; N]) -> Self {
        Self {
            names: names.map(str::to_owned),
            data: std::array::from_fn(|_| Vec::new()),
        }
    }

    /// Records a single data point across all traces.
    pub fn record(&mut self, x: f64, traces: [Option<f64>; N]) {
        for (i, y) in traces.into_iter().enumerate() {
            if let Some(y) = y {
                self.data[i].push([x, y]);
            }
        }
    }

    /// Opens a blocking egui window displaying all collected traces.
    ///
    /// # Errors
    ///
    /// Returns an error if the native window cannot be created.
    pub fn show(self, config: ShowConfig) -> Result<(), eframe::Error> {
        let options = eframe::NativeOptions::default();
        let title = config.title.unwrap_or_default();
        let traces: Vec<(String, Vec<[f64; 2]>)> = self.names.into_iter().zip(self.data).collect();

        eframe::run_native(
            &title,
            options,
            Box::new(move |_cc| {
                Ok(Box::new(PlotApp {
                    traces,
                    legend: config.legend,
                }))
            }),
        )
    }
}

impl<const N: usize, E, A> Observer<E, A> for PlotObserver<N>
where
    E: Plottable<N>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        if let Some(x) = event.x() {
            self.record(x, event.traces());
        }
        None
    }
}

impl<const N: usize, E, A> Observer<E, A> for &mut PlotObserver<N>
where
    E: Plottable<N>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        (*self).observe(event)
    }
}

struct PlotApp {
    traces: Vec<(String, Vec<[f64; 2]>)>,
    legend: bool,
}

impl eframe::App for PlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let mut plot = Plot::new("ride").x_axis_label("t [s]");
            if self.legend {
                plot = plot.legend(Legend::default());
            }
            plot.show(ui, |plot_ui| {
                for (name, points) in &self.traces {
                    let plot_points: PlotPoints = points.iter().copied().collect();
                    plot_ui.line(Line::new(plot_points).name(name));
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use thumper_sim::{
        session::Session,
        simulation::{Action, FrameDelta, Stepping},
    };
    use uom::si::{f64::Time, time::second};

    fn points<const N: usize>(obs: &PlotObserver<N>, trace: usize) -> &[[f64; 2]] {
        &obs.data[trace]
    }

    #[test]
    fn records_every_event_of_a_run() {
        let mut session = Session::new(Default::default()).unwrap();
        session.toggle_engine();
        let mut obs = PlotObserver::<2>::new(["rpm / 100", "km/h"]);

        simulation::run(
            &mut session,
            Stepping::FixedSteps {
                dt: FrameDelta::per_second(10.0).unwrap(),
                num_steps: 4,
            },
            &mut obs,
        );

        assert_eq!(points(&obs, 0).len(), 5);
        assert_eq!(points(&obs, 0)[0], [0.0, 12.0]);
        assert_eq!(points(&obs, 1)[0], [0.0, 0.0]);
    }

    #[test]
    fn record_skips_missing_slots() {
        let mut obs = PlotObserver::<2>::new(["a", "b"]);
        obs.record(1.0, [Some(10.0), None]);
        obs.record(2.0, [None, Some(20.0)]);
        assert_eq!(points(&obs, 0), [[1.0, 10.0]]);
        assert_eq!(points(&obs, 1), [[2.0, 20.0]]);
    }

    #[test]
    fn never_returns_an_action() {
        let mut obs = PlotObserver::<2>::new(["a", "b"]);
        let event = simulation::Event {
            step: 0,
            time: Time::new::<second>(0.0),
            tick: None,
            dashboard: Session::new(Default::default()).unwrap().dashboard(),
        };
        let action: Option<Action> = obs.observe(&event);
        assert!(action.is_none());
    }
}

//! Deterministic fixed-step scheduler.
//!
//! [`run`] advances a [`Session`] by a fixed step, reporting each committed
//! tick to an [`Observer`]. It replaces the host's display refresh with a
//! replayable clock, which is how tests and offline tooling drive the
//! simulation. Controls stay as the session holds them for the whole run;
//! chain runs to script a ride:
//!
//! ```
//! use thumper_sim::{
//!     session::Session,
//!     shift::ShiftDirection,
//!     simulation::{self, FrameDelta, Stepping, Status},
//! };
//!
//! let dt = FrameDelta::per_second(60.0).unwrap();
//! let mut session = Session::new(Default::default()).unwrap();
//!
//! session.toggle_engine();
//! session.set_throttle(0.6);
//! let blip = simulation::run_unobserved(&mut session, Stepping::FixedSteps { dt, num_steps: 30 });
//! assert_eq!(blip.status, Status::Complete);
//!
//! session.set_throttle(0.0);
//! session.set_clutch(1.0);
//! session.shift_gear(ShiftDirection::Up);
//! let settle = simulation::run_unobserved(&mut session, Stepping::FixedSteps { dt, num_steps: 30 });
//! assert_eq!(settle.steps, 30);
//! ```

mod action;
mod event;
mod frame_delta;
mod solution;

pub use action::Action;
pub use event::Event;
pub use frame_delta::{FrameDelta, FrameDeltaError};
pub use solution::{Solution, Status};

use thumper_core::{Observer, Snapshot};
use uom::si::{f64::Time, time::second};

use crate::{audio::AudioSink, physics::TickInput, session::Session};

/// Upper bound on the history reserved before a run starts.
const MAX_RESERVED_STEPS: usize = 1 << 16;

/// Defines how a run advances over time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stepping {
    /// Advance by `dt` for `num_steps`.
    FixedSteps { dt: FrameDelta, num_steps: usize },

    /// Advance by `dt` until at least `duration` has elapsed (may overstep).
    ///
    /// A duration too long to count in steps runs until the observer stops it.
    ForDuration { dt: FrameDelta, duration: Time },
}

impl Stepping {
    /// The step size and number of steps this policy resolves to.
    ///
    /// A non-positive or NaN `duration` resolves to zero steps. A step count
    /// past `usize::MAX`, including an infinite one, saturates to `usize::MAX`.
    #[must_use]
    pub fn resolve(self) -> (FrameDelta, usize) {
        match self {
            Stepping::FixedSteps { dt, num_steps } => (dt, num_steps),
            Stepping::ForDuration { dt, duration } => {
                let steps = (duration.get::<second>() / dt.seconds()).ceil();
                (dt, to_step_count(steps))
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_step_count(steps: f64) -> usize {
    if steps > 0.0 {
        // Float to int casts saturate, so infinity lands on `usize::MAX`.
        steps as usize
    } else {
        0
    }
}

/// Advances `session` according to `stepping`.
///
/// # Algorithm
///
/// 1. Emit step 0 with the session's current dashboard.
/// 2. For each step:
///    - Capture the tick input (state, controls, `dt`).
///    - Advance and commit the session.
///    - Record the tick in the history.
///    - Emit an [`Event`] to the observer.
///    - If the observer returns [`Action::StopEarly`], return.
///
/// Every tick either commits fully or never starts: the observer runs only
/// between ticks. The history grows as the run goes, so a huge step count
/// costs memory only for the ticks actually taken.
pub fn run<A, Obs>(session: &mut Session<A>, stepping: Stepping, mut observer: Obs) -> Solution
where
    A: AudioSink,
    Obs: Observer<Event, Action>,
{
    let (dt, steps) = stepping.resolve();
    let mut history = Vec::with_capacity(steps.min(MAX_RESERVED_STEPS));

    let event = Event {
        step: 0,
        time: session.clock(),
        tick: None,
        dashboard: session.dashboard(),
    };
    if let Some(Action::StopEarly) = observer.observe(&event) {
        return Solution {
            status: Status::StoppedByObserver,
            history,
            steps: 0,
        };
    }

    for step in 1..=steps {
        let input = TickInput {
            state: *session.state(),
            controls: *session.controls(),
            dt: dt.time(),
        };
        let output = session.advance(dt.time());
        let snapshot = Snapshot::new(input, output);
        history.push(snapshot);

        let event = Event {
            step,
            time: session.clock(),
            tick: Some(snapshot),
            dashboard: session.dashboard(),
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Solution {
                status: Status::StoppedByObserver,
                history,
                steps: step,
            };
        }
    }

    Solution {
        status: Status::Complete,
        history,
        steps,
    }
}

/// Advances `session` without observation.
///
/// This is a convenience wrapper around [`run`] that discards events.
pub fn run_unobserved<A: AudioSink>(session: &mut Session<A>, stepping: Stepping) -> Solution {
    run(session, stepping, ())
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use thumper_core::Model;

    use crate::{config::BikeConfig, gear::Gear, shift::ShiftDirection};

    fn frame() -> FrameDelta {
        FrameDelta::per_second(60.0).unwrap()
    }

    fn running() -> Session {
        let mut session = Session::new(BikeConfig::default()).unwrap();
        session.toggle_engine();
        session
    }

    #[test]
    fn fixed_steps_commit_every_tick() {
        let mut session = running();
        session.set_throttle(0.3);

        let solution = run_unobserved(
            &mut session,
            Stepping::FixedSteps {
                dt: frame(),
                num_steps: 10,
            },
        );

        assert_eq!(solution.status, Status::Complete);
        assert_eq!(solution.steps, 10);
        assert_eq!(solution.history.len(), 10);
        assert_eq!(solution.last().unwrap().output.state, *session.state());
        assert_relative_eq!(session.clock().get::<second>(), 10.0 / 60.0, epsilon = 1e-12);
    }

    #[test]
    fn history_replays_through_the_model() {
        let mut session = running();
        session.set_throttle(0.8);
        let solution = run_unobserved(
            &mut session,
            Stepping::FixedSteps {
                dt: frame(),
                num_steps: 5,
            },
        );

        let physics = session.physics();
        for snapshot in &solution.history {
            assert_eq!(physics.call(&snapshot.input).unwrap(), snapshot.output);
        }
        for pair in solution.history.windows(2) {
            assert_eq!(pair[0].output.state, pair[1].input.state);
        }
    }

    #[test]
    fn for_duration_rounds_up() {
        let (_, steps) = Stepping::ForDuration {
            dt: FrameDelta::from_seconds(0.3).unwrap(),
            duration: Time::new::<second>(1.0),
        }
        .resolve();
        assert_eq!(steps, 4);

        let (_, steps) = Stepping::ForDuration {
            dt: frame(),
            duration: Time::new::<second>(-1.0),
        }
        .resolve();
        assert_eq!(steps, 0);

        let (_, steps) = Stepping::ForDuration {
            dt: frame(),
            duration: Time::new::<second>(f64::NAN),
        }
        .resolve();
        assert_eq!(steps, 0);

        let (_, steps) = Stepping::ForDuration {
            dt: frame(),
            duration: Time::new::<second>(f64::INFINITY),
        }
        .resolve();
        assert_eq!(steps, usize::MAX);
    }

    #[test]
    fn enormous_duration_runs_until_stopped() {
        let mut session = running();
        let observer = |event: &Event| (event.step >= 3).then_some(Action::StopEarly);

        let solution = run(
            &mut session,
            Stepping::ForDuration {
                dt: frame(),
                duration: Time::new::<second>(1e12),
            },
            observer,
        );

        assert_eq!(solution.status, Status::StoppedByObserver);
        assert_eq!(solution.steps, 3);
        assert_eq!(solution.history.len(), 3);
    }

    #[test]
    fn observer_can_stop_early() {
        let mut session = running();
        let observer = |event: &Event| (event.step >= 5).then_some(Action::StopEarly);

        let solution = run(
            &mut session,
            Stepping::FixedSteps {
                dt: frame(),
                num_steps: 100,
            },
            observer,
        );

        assert_eq!(solution.status, Status::StoppedByObserver);
        assert_eq!(solution.steps, 5);
        assert_eq!(solution.history.len(), 5);
        assert_relative_eq!(session.clock().get::<second>(), 5.0 / 60.0, epsilon = 1e-12);
    }

    #[test]
    fn stopping_at_step_zero_runs_nothing() {
        let mut session = running();
        let before = *session.state();

        let solution = run(
            &mut session,
            Stepping::FixedSteps {
                dt: frame(),
                num_steps: 10,
            },
            |_: &Event| Some(Action::StopEarly),
        );

        assert_eq!(solution.steps, 0);
        assert!(solution.history.is_empty());
        assert_eq!(*session.state(), before);
    }

    #[test]
    fn step_numbers_start_at_zero() {
        let mut session = running();
        let mut steps = Vec::new();
        run(
            &mut session,
            Stepping::FixedSteps {
                dt: frame(),
                num_steps: 3,
            },
            |event: &Event| {
                assert_eq!(event.tick.is_none(), event.step == 0);
                steps.push(event.step);
                None
            },
        );
        assert_eq!(steps, vec![0, 1, 2, 3]);
    }

    #[test]
    fn events_report_stalls() {
        let mut session = running();
        session.set_clutch(1.0);
        session.shift_gear(ShiftDirection::Up);
        session.set_clutch(0.0);

        let mut stalled_at = None;
        run(
            &mut session,
            Stepping::FixedSteps {
                dt: frame(),
                num_steps: 3,
            },
            |event: &Event| {
                if event.stalled() {
                    stalled_at.get_or_insert(event.step);
                }
                None
            },
        );

        assert_eq!(stalled_at, Some(1));
        assert_eq!(session.state().gear, Gear::First);
        assert!(!session.state().engine_on);
    }
}

//! Interactive charts of scripted rides.
//!
//! Each mode runs a short ride at 60 frames per second and opens a plot window
//! showing rpm (divided by 100) and road speed over time.
//!
//! # Usage
//!
//! ```text
//! cargo run --example plot --features plot -- launch
//! cargo run --example plot --features plot -- launch 0.8
//! cargo run --example plot --features plot -- brake
//! ```
//!
//! # Modes
//!
//! - **launch [throttle]**: pull away in first and shift up through the box
//!   every two seconds. The rpm trace drops at each shift while speed keeps
//!   climbing. Throttle defaults to `0.6`.
//!
//! - **brake**: reach cruising speed in second, then hold the brake with the
//!   clutch pulled. Speed falls faster as brake pressure ramps up.

use std::error::Error;

use thumper_core::Observer;
use thumper_observers::{PlotObserver, ShowConfig, StopOnStall};
use thumper_sim::{
    session::Session,
    shift::ShiftDirection,
    simulation::{self, Action, Event, FrameDelta, Stepping},
};

const SHIFT_EVERY: usize = 120;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let mode = std::env::args().nth(1).unwrap_or_else(|| "launch".into());
    match mode.as_str() {
        "launch" => {
            let throttle = std::env::args()
                .nth(2)
                .as_deref()
                .map(str::parse::<f64>)
                .transpose()?
                .unwrap_or(0.6);
            launch(throttle)
        }
        "brake" => brake(),
        other => {
            eprintln!("Unknown mode: {other}");
            eprintln!("Usage: plot [launch [throttle]|brake]");
            std::process::exit(1);
        }
    }
}

fn frames(num_steps: usize) -> Result<Stepping, Box<dyn Error>> {
    Ok(Stepping::FixedSteps {
        dt: FrameDelta::per_second(60.0)?,
        num_steps,
    })
}

fn pull_away(session: &mut Session, throttle: f64) {
    session.toggle_engine();
    session.set_clutch(1.0);
    session.shift_gear(ShiftDirection::Up);
    session.set_clutch(0.0);
    session.set_throttle(throttle);
}

/// Launch in first and work up to fifth.
fn launch(throttle: f64) -> Result<(), Box<dyn Error>> {
    let mut session = Session::new(Default::default())?;
    let mut obs = PlotObserver::<2>::new(["rpm / 100", "km/h"]);
    let mut stall = StopOnStall::new();

    pull_away(&mut session, throttle);
    for _ in 0..5 {
        simulation::run(
            &mut session,
            frames(SHIFT_EVERY)?,
            |event: &Event| -> Option<Action> {
                let _: Option<Action> = obs.observe(event);
                stall.observe(event)
            },
        );
        if let Some(t) = stall.stalled_at() {
            eprintln!("stalled at {t:.2} s");
            break;
        }

        session.set_clutch(1.0);
        session.shift_gear(ShiftDirection::Up);
        session.set_clutch(0.0);
    }

    obs.show(
        ShowConfig::new()
            .title(format!("Launch at {:.0}% throttle", throttle * 100.0))
            .legend(),
    )?;

    Ok(())
}

/// Cruise in second, then brake to a stop with the clutch pulled.
fn brake() -> Result<(), Box<dyn Error>> {
    let mut session = Session::new(Default::default())?;
    let mut obs = PlotObserver::<2>::new(["rpm / 100", "km/h"]);

    pull_away(&mut session, 0.6);
    simulation::run(&mut session, frames(SHIFT_EVERY)?, &mut obs);

    session.set_clutch(1.0);
    session.shift_gear(ShiftDirection::Up);
    session.set_clutch(0.0);
    simulation::run(&mut session, frames(3 * SHIFT_EVERY)?, &mut obs);

    session.set_clutch(1.0);
    session.set_throttle(0.0);
    session.set_brake(true);
    simulation::run(&mut session, frames(4 * SHIFT_EVERY)?, &mut obs);

    obs.show(ShowConfig::new().title("Braking from cruise").legend())?;

    Ok(())
}

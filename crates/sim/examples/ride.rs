//! A scripted ride printed as a dashboard readout.
//!
//! ```text
//! RUST_LOG=debug cargo run --example ride
//! ```
//!
//! Starts the engine, tries to shift without the clutch (the advisory shows),
//! then pulls away in first, short-shifts to second, and brakes to a stop.

use std::error::Error;

use thumper_sim::{
    audio::SynthVoice,
    dashboard::Dashboard,
    session::Session,
    shift::ShiftDirection,
    simulation::{self, Action, Event, FrameDelta, Stepping},
};
use tracing_subscriber::EnvFilter;
use uom::si::{f64::Time, time::second};

const FPS: f64 = 60.0;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let dt = FrameDelta::per_second(FPS)?;
    let mut session = Session::with_audio(Default::default(), SynthVoice::new())?;
    let seconds = |s: f64| Stepping::ForDuration {
        dt,
        duration: Time::new::<second>(s),
    };
    let print_each_half_second = |event: &Event| -> Option<Action> {
        if event.step % 30 == 0 {
            print_dashboard(event);
        }
        None
    };

    println!("-- start the engine and shift without the clutch");
    session.toggle_engine();
    session.shift_gear(ShiftDirection::Up);
    simulation::run(&mut session, seconds(0.5), print_each_half_second);

    println!("-- clutch in, first gear, pull away");
    session.set_clutch(1.0);
    session.shift_gear(ShiftDirection::Up);
    session.set_throttle(0.5);
    session.set_clutch(0.0);
    simulation::run(&mut session, seconds(3.0), print_each_half_second);

    println!("-- second gear");
    session.set_clutch(1.0);
    session.shift_gear(ShiftDirection::Up);
    session.set_clutch(0.0);
    simulation::run(&mut session, seconds(3.0), print_each_half_second);

    println!("-- clutch in and brake");
    session.set_throttle(0.0);
    session.set_clutch(1.0);
    session.set_brake(true);
    simulation::run(&mut session, seconds(4.0), print_each_half_second);

    let clicks = session.audio_mut().take_shift_clicks().len();
    let sound = session.audio().current();
    println!(
        "-- {clicks} shift clicks, engine note {:.0} Hz / {:.0} Hz, filter {:.0} Hz",
        sound.low_hz, sound.high_hz, sound.cutoff_hz
    );

    Ok(())
}

fn print_dashboard(event: &Event) {
    let Dashboard {
        rpm,
        speed_kmh,
        gear,
        warning,
        in_redline,
        ..
    } = event.dashboard;
    let tach = if in_redline { "!" } else { " " };
    println!(
        "t={:5.2}s  {rpm:>5} rpm{tach}  {speed_kmh:>3} km/h  gear {gear}  {warning}",
        event.time.get::<second>()
    );
}

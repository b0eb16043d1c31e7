//! The in-process interface between the presentation layer and the simulation.
//!
//! A [`Session`] owns the drivetrain state for one ride. Input handlers call
//! the setters and the discrete actions ([`shift_gear`](Session::shift_gear),
//! [`toggle_engine`](Session::toggle_engine)) between frames; the scheduler
//! calls [`frame`](Session::frame) with host timestamps or
//! [`advance`](Session::advance) with a fixed step. Everything is
//! synchronous and single-threaded.

use thumper_core::Fraction;
use tracing::{debug, info, trace};
use uom::si::{f64::Time, time::second};

use crate::{
    audio::AudioSink,
    config::{BikeConfig, ConfigError},
    controls::Controls,
    dashboard::Dashboard,
    physics::{Physics, TickOutput},
    shift::{Gearbox, ShiftDirection, ShiftOutcome, ShiftRequest},
    state::DrivetrainState,
    warning::WarningBanner,
};

/// One ride on one bike.
///
/// The audio sink defaults to `()`, which is silent.
///
/// # Example
///
/// ```
/// use thumper_sim::{session::Session, shift::ShiftDirection};
/// use uom::si::{f64::Time, time::second};
///
/// let mut session = Session::new(Default::default()).unwrap();
/// session.toggle_engine();
/// session.set_clutch(1.0);
/// session.shift_gear(ShiftDirection::Up);
/// session.set_clutch(0.0);
/// session.set_throttle(0.5);
///
/// for _ in 0..60 {
///     session.advance(Time::new::<second>(1.0 / 60.0));
/// }
///
/// let dash = session.dashboard();
/// assert_eq!(dash.gear.to_string(), "1");
/// assert!(dash.engine_on);
/// assert!(dash.speed_kmh > 0);
/// ```
#[derive(Debug, Clone)]
pub struct Session<A = ()> {
    physics: Physics,
    state: DrivetrainState,
    controls: Controls,
    warning: WarningBanner,
    audio: A,
    clock: Time,
    last_tick: Option<Time>,
}

impl Session<()> {
    /// Creates a silent session.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `config` is invalid.
    pub fn new(config: BikeConfig) -> Result<Self, ConfigError> {
        Self::with_audio(config, ())
    }
}

impl<A: AudioSink> Session<A> {
    /// Creates a session that drives `audio`.
    ///
    /// The bike starts parked: engine off, neutral, at rest.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `config` is invalid.
    pub fn with_audio(config: BikeConfig, audio: A) -> Result<Self, ConfigError> {
        Ok(Self {
            physics: Physics::new(config)?,
            state: DrivetrainState::parked(),
            controls: Controls::default(),
            warning: WarningBanner::default(),
            audio,
            clock: Time::new::<second>(0.0),
            last_tick: None,
        })
    }

    /// Sets clutch lever travel, clamped to `[0, 1]`.
    pub fn set_clutch(&mut self, value: f64) {
        self.controls.clutch = Fraction::clamped(value);
    }

    /// Sets throttle opening, clamped to `[0, 1]`.
    pub fn set_throttle(&mut self, value: f64) {
        self.controls.throttle = Fraction::clamped(value);
    }

    pub fn set_brake(&mut self, active: bool) {
        self.controls.brake = active;
    }

    /// Requests a gear change.
    ///
    /// A refused shift leaves the gear alone and shows the advisory for one
    /// second. An effective shift plays the shift click.
    pub fn shift_gear(&mut self, direction: ShiftDirection) -> ShiftOutcome {
        let outcome = Gearbox::shift(ShiftRequest {
            gear: self.state.gear,
            clutch: self.controls.clutch,
            direction,
        });

        match outcome {
            ShiftOutcome::Shifted { from, to } => {
                debug!(%from, %to, "shifted");
                self.state.gear = to;
                self.audio.play_shift_click();
            }
            ShiftOutcome::Unchanged(gear) => {
                debug!(%gear, %direction, "shift ignored at gearbox limit");
            }
            ShiftOutcome::Rejected(rejection) => {
                debug!(clutch = self.controls.clutch.get(), %direction, "shift rejected");
                self.warning.show(rejection.message(), self.clock);
            }
        }

        outcome
    }

    /// Starts or stops the engine and returns whether it is now running.
    ///
    /// Starting seeds the rpm at idle immediately; stopping lets it spin down.
    pub fn toggle_engine(&mut self) -> bool {
        self.audio.resume();
        self.state.engine_on = !self.state.engine_on;
        if self.state.engine_on {
            self.state.rpm = self.physics.config().idle_rpm;
            info!(rpm = self.state.rpm, "engine started");
        } else {
            info!(rpm = self.state.rpm, "engine stopped");
        }
        self.state.engine_on
    }

    /// Handles a host display frame stamped `timestamp`.
    ///
    /// The first frame after creation or [`reset_frame_clock`](Session::reset_frame_clock)
    /// only records the timestamp and returns `None`. Later frames advance by
    /// the time since the previous frame; a clock that steps backwards
    /// advances by zero.
    pub fn frame(&mut self, timestamp: Time) -> Option<TickOutput> {
        let Some(last) = self.last_tick.replace(timestamp) else {
            trace!(t = timestamp.get::<second>(), "first frame, integration skipped");
            self.clock = timestamp;
            self.warning.poll(self.clock);
            return None;
        };

        let dt = timestamp - last;
        let dt = if dt.get::<second>() > 0.0 {
            dt
        } else {
            Time::new::<second>(0.0)
        };
        Some(self.advance(dt))
    }

    /// Advances the simulation by `dt` and commits the result.
    ///
    /// Drives the audio sink with the new rpm, lets `dt` of audio time pass,
    /// and clears an expired warning.
    pub fn advance(&mut self, dt: Time) -> TickOutput {
        let output = self.physics.tick(&self.state, &self.controls, dt);

        if output.stalled {
            info!(
                speed_kmh = output.state.speed_kmh(),
                gear = %output.state.gear,
                "engine stalled"
            );
        }

        self.state = output.state;
        self.clock += dt;
        self.warning.poll(self.clock);
        self.audio
            .set_engine_sound(self.state.rpm, self.controls.throttle);
        self.audio.advance(dt);

        output
    }

    /// Forgets the previous frame timestamp so the next frame starts a fresh
    /// delta. Used when the host loop restarts after a pause.
    pub fn reset_frame_clock(&mut self) {
        self.last_tick = None;
    }

    /// Display values for the current state.
    #[must_use]
    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(
            self.physics.config(),
            &self.state,
            &self.controls,
            self.warning.text(),
        )
    }

    /// The read-only bike constants, for gauge scaling.
    #[must_use]
    pub fn config(&self) -> &BikeConfig {
        self.physics.config()
    }

    #[must_use]
    pub fn physics(&self) -> &Physics {
        &self.physics
    }

    #[must_use]
    pub fn state(&self) -> &DrivetrainState {
        &self.state
    }

    #[must_use]
    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    /// Simulation time, following host timestamps once frames arrive.
    #[must_use]
    pub fn clock(&self) -> Time {
        self.clock
    }

    #[must_use]
    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::time::millisecond;

    use crate::{
        audio::{ShiftClick, SynthVoice},
        gear::Gear,
    };

    fn ms(value: f64) -> Time {
        Time::new::<millisecond>(value)
    }

    fn session() -> Session {
        Session::new(BikeConfig::default()).unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let config = BikeConfig {
            max_rpm: 5_000.0,
            ..BikeConfig::default()
        };
        assert!(Session::new(config).is_err());
    }

    #[test]
    fn starting_the_engine_seeds_idle() {
        let mut session = session();
        assert!(session.toggle_engine());
        assert_relative_eq!(session.state().rpm, 1_200.0);
        assert_eq!(session.dashboard().rpm, 1_200);
    }

    #[test]
    fn stopping_the_engine_lets_rpm_spin_down() {
        let mut session = session();
        session.toggle_engine();
        assert!(!session.toggle_engine());
        assert_relative_eq!(session.state().rpm, 1_200.0);

        session.advance(Time::new::<second>(0.5));
        assert_relative_eq!(session.state().rpm, 450.0);
    }

    #[test]
    fn inputs_are_clamped() {
        let mut session = session();
        session.set_clutch(2.0);
        session.set_throttle(-1.0);
        session.set_brake(true);

        let dash = session.dashboard();
        assert_eq!(dash.clutch, Fraction::ONE);
        assert_eq!(dash.throttle, Fraction::ZERO);
        assert!(dash.brake);
    }

    #[test]
    fn rejected_shift_warns_for_one_second() {
        let mut session = session();
        session.frame(ms(1_000.0));

        let outcome = session.shift_gear(ShiftDirection::Up);
        assert!(matches!(outcome, ShiftOutcome::Rejected(_)));
        assert_eq!(session.state().gear, Gear::Neutral);
        assert_eq!(session.dashboard().warning, "PULL CLUTCH TO SHIFT!");

        session.frame(ms(1_500.0));
        assert_eq!(session.dashboard().warning, "PULL CLUTCH TO SHIFT!");

        session.frame(ms(2_016.0));
        assert_eq!(session.dashboard().warning, "");
    }

    #[test]
    fn repeated_rejection_restarts_the_warning() {
        let mut session = session();
        session.frame(ms(0.0));
        session.shift_gear(ShiftDirection::Up);

        session.frame(ms(800.0));
        session.shift_gear(ShiftDirection::Down);

        session.frame(ms(1_200.0));
        assert_eq!(session.dashboard().warning, "PULL CLUTCH TO SHIFT!");

        session.frame(ms(1_900.0));
        assert_eq!(session.dashboard().warning, "");
    }

    #[test]
    fn effective_shifts_click_and_no_ops_do_not() {
        let mut session = Session::with_audio(BikeConfig::default(), SynthVoice::new()).unwrap();
        session.set_clutch(1.0);

        session.shift_gear(ShiftDirection::Down);
        assert!(session.audio_mut().take_shift_clicks().is_empty());

        session.shift_gear(ShiftDirection::Up);
        session.shift_gear(ShiftDirection::Up);
        assert_eq!(session.state().gear, Gear::Second);
        assert_eq!(
            session.audio_mut().take_shift_clicks(),
            vec![ShiftClick::standard(); 2]
        );

        session.set_clutch(0.0);
        session.shift_gear(ShiftDirection::Up);
        assert_eq!(session.state().gear, Gear::Second);
        assert!(session.audio_mut().take_shift_clicks().is_empty());
    }

    #[test]
    fn first_frame_only_records_the_timestamp() {
        let mut session = session();
        session.toggle_engine();
        session.set_throttle(1.0);

        assert!(session.frame(ms(16_000.0)).is_none());
        assert_relative_eq!(session.state().rpm, 1_200.0);

        let output = session.frame(ms(16_100.0)).unwrap();
        assert_relative_eq!(output.state.rpm, 5_600.0, epsilon = 1e-6);
    }

    #[test]
    fn backwards_clock_advances_by_zero() {
        let mut session = session();
        session.toggle_engine();
        session.set_throttle(1.0);
        session.frame(ms(500.0));

        let output = session.frame(ms(400.0)).unwrap();
        assert_relative_eq!(output.state.rpm, 1_200.0);
    }

    #[test]
    fn reset_frame_clock_skips_the_gap() {
        let mut session = session();
        session.toggle_engine();
        session.frame(ms(0.0));
        session.frame(ms(16.0));

        session.reset_frame_clock();
        assert!(session.frame(ms(60_000.0)).is_none());
    }

    #[test]
    fn starting_resumes_audio_and_ticks_drive_it() {
        let mut session = Session::with_audio(BikeConfig::default(), SynthVoice::new()).unwrap();
        session.toggle_engine();
        assert!(session.audio().is_resumed());

        session.advance(Time::new::<second>(1.0 / 60.0));
        assert_relative_eq!(session.audio().target().volume, 0.5);
    }

    #[test]
    fn voice_glides_toward_the_engine_while_riding() {
        let mut session = Session::with_audio(BikeConfig::default(), SynthVoice::new()).unwrap();
        session.toggle_engine();
        session.set_throttle(0.5);

        session.advance(Time::new::<second>(1.0 / 60.0));
        let first = session.audio().current();
        assert!(first.volume > 0.0 && first.volume < 0.5);
        assert!(first.low_hz > 0.0);

        for _ in 0..119 {
            session.advance(Time::new::<second>(1.0 / 60.0));
        }
        let current = session.audio().current();
        let target = session.audio().target();
        assert_relative_eq!(current.volume, 0.5, epsilon = 1e-6);
        assert_relative_eq!(target.low_hz, 5_600.0 / 120.0 * 5.0, epsilon = 0.1);
        assert!(current.low_hz > first.low_hz);
        assert!((target.low_hz - current.low_hz).abs() < 1.0);
    }
}

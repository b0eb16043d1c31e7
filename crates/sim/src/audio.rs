//! Engine sound mapping and the audio capability interface.
//!
//! The simulation drives an [`AudioSink`] once per tick with the engine rpm
//! and throttle, and fires a shift click on every effective gear change.
//! Hosts without audio use `()`, which ignores every call.
//!
//! [`EngineSound::from_engine`] is the pure mapping from engine state to
//! synthesizer targets. [`SynthVoice`] is a headless voice that smooths those
//! targets over time the way an audio graph would, so a host backend can poll
//! it for parameters.

use thumper_core::Fraction;
use uom::si::{f64::Time, time::second};

/// Below this rpm the engine is silent.
pub const MUTE_BELOW_RPM: f64 = 100.0;

/// Master volume while the engine is turning.
pub const RUNNING_VOLUME: f64 = 0.5;

/// Resonance of the low-pass filter.
pub const FILTER_Q: f64 = 5.0;

const VOLUME_TIME_CONSTANT: f64 = 0.1;
const OSCILLATOR_TIME_CONSTANT: f64 = 0.05;
const FILTER_TIME_CONSTANT: f64 = 0.1;

/// Capability interface for the host's audio backend.
pub trait AudioSink {
    /// Retargets the engine voice for the given rpm and throttle.
    fn set_engine_sound(&mut self, rpm: f64, throttle: Fraction);

    /// Plays the one-shot shift click.
    fn play_shift_click(&mut self);

    /// Resumes a suspended backend. Called when the rider starts the engine.
    fn resume(&mut self) {}

    /// Lets `dt` of audio time pass. Called after every tick.
    fn advance(&mut self, _dt: Time) {}
}

/// Silent audio for headless hosts and tests.
impl AudioSink for () {
    fn set_engine_sound(&mut self, _rpm: f64, _throttle: Fraction) {}

    fn play_shift_click(&mut self) {}
}

/// Synthesizer parameters for the single-cylinder engine voice.
///
/// Two oscillators (a square at `low_hz` and a sawtooth at `high_hz`) feed a
/// resonant low-pass filter at `cutoff_hz`, then a master gain of `volume`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSound {
    pub volume: f64,
    pub low_hz: f64,
    pub high_hz: f64,
    pub cutoff_hz: f64,
}

impl EngineSound {
    /// Maps engine state to synthesizer targets.
    ///
    /// The firing frequency of a four-stroke single is `rpm / 120` Hz; the
    /// oscillators sit at five and two times that. The filter opens with both
    /// rpm and throttle. Below [`MUTE_BELOW_RPM`] the volume is zero.
    #[must_use]
    pub fn from_engine(rpm: f64, throttle: Fraction) -> Self {
        let firing_hz = rpm / 60.0 / 2.0;
        Self {
            volume: if rpm < MUTE_BELOW_RPM {
                0.0
            } else {
                RUNNING_VOLUME
            },
            low_hz: firing_hz * 5.0,
            high_hz: firing_hz * 2.0,
            cutoff_hz: 80.0 + rpm * 0.2 + throttle * 1000.0,
        }
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.volume == 0.0
    }
}

impl Default for EngineSound {
    fn default() -> Self {
        Self::from_engine(0.0, Fraction::ZERO)
    }
}

/// The short descending burst played on a gear change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftClick {
    pub start_hz: f64,
    pub end_hz: f64,
    pub start_gain: f64,
    pub end_gain: f64,
    pub duration: Time,
}

impl ShiftClick {
    /// Square-wave click sweeping 100 Hz → 10 Hz over 100 ms.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            start_hz: 100.0,
            end_hz: 10.0,
            start_gain: 0.2,
            end_gain: 0.01,
            duration: Time::new::<second>(0.1),
        }
    }

    /// Frequency at `t` into the click, on an exponential ramp.
    #[must_use]
    pub fn frequency_at(&self, t: Time) -> f64 {
        exponential_ramp(self.start_hz, self.end_hz, self.progress(t))
    }

    /// Gain at `t` into the click, on an exponential ramp. Silent once finished.
    #[must_use]
    pub fn gain_at(&self, t: Time) -> f64 {
        if t >= self.duration {
            0.0
        } else {
            exponential_ramp(self.start_gain, self.end_gain, self.progress(t))
        }
    }

    fn progress(&self, t: Time) -> f64 {
        (t.get::<second>() / self.duration.get::<second>()).clamp(0.0, 1.0)
    }
}

impl Default for ShiftClick {
    fn default() -> Self {
        Self::standard()
    }
}

fn exponential_ramp(start: f64, end: f64, progress: f64) -> f64 {
    start * (end / start).powf(progress)
}

/// A parameter that glides toward its target with a fixed time constant.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Smoothed {
    current: f64,
    target: f64,
    time_constant: f64,
}

impl Smoothed {
    fn new(value: f64, time_constant: f64) -> Self {
        Self {
            current: value,
            target: value,
            time_constant,
        }
    }

    fn advance(&mut self, dt: f64) {
        let decay = (-dt / self.time_constant).exp();
        self.current = self.target + (self.current - self.target) * decay;
    }
}

/// A headless engine voice.
///
/// Implements [`AudioSink`] by recording targets, and glides its live
/// parameters toward them on [`advance`](AudioSink::advance) so that no
/// parameter ever jumps. While muted the oscillators and filter hold their
/// last targets and only the volume falls. Shift clicks queue up until the
/// host drains them with [`take_shift_clicks`](SynthVoice::take_shift_clicks).
#[derive(Debug, Clone, PartialEq)]
pub struct SynthVoice {
    volume: Smoothed,
    low_hz: Smoothed,
    high_hz: Smoothed,
    cutoff_hz: Smoothed,
    pending_clicks: Vec<ShiftClick>,
    resumed: bool,
}

impl SynthVoice {
    /// Creates a silent, suspended voice.
    #[must_use]
    pub fn new() -> Self {
        let initial = EngineSound::default();
        Self {
            volume: Smoothed::new(0.0, VOLUME_TIME_CONSTANT),
            low_hz: Smoothed::new(initial.low_hz, OSCILLATOR_TIME_CONSTANT),
            high_hz: Smoothed::new(initial.high_hz, OSCILLATOR_TIME_CONSTANT),
            cutoff_hz: Smoothed::new(initial.cutoff_hz, FILTER_TIME_CONSTANT),
            pending_clicks: Vec::new(),
            resumed: false,
        }
    }

    /// The live (smoothed) parameters.
    #[must_use]
    pub fn current(&self) -> EngineSound {
        EngineSound {
            volume: self.volume.current,
            low_hz: self.low_hz.current,
            high_hz: self.high_hz.current,
            cutoff_hz: self.cutoff_hz.current,
        }
    }

    /// The parameters the voice is gliding toward.
    #[must_use]
    pub fn target(&self) -> EngineSound {
        EngineSound {
            volume: self.volume.target,
            low_hz: self.low_hz.target,
            high_hz: self.high_hz.target,
            cutoff_hz: self.cutoff_hz.target,
        }
    }

    /// Drains the shift clicks requested since the last call, oldest first.
    pub fn take_shift_clicks(&mut self) -> Vec<ShiftClick> {
        std::mem::take(&mut self.pending_clicks)
    }

    #[must_use]
    pub fn is_resumed(&self) -> bool {
        self.resumed
    }
}

impl Default for SynthVoice {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for SynthVoice {
    fn set_engine_sound(&mut self, rpm: f64, throttle: Fraction) {
        let sound = EngineSound::from_engine(rpm, throttle);
        self.volume.target = sound.volume;
        if sound.is_muted() {
            return;
        }
        self.low_hz.target = sound.low_hz;
        self.high_hz.target = sound.high_hz;
        self.cutoff_hz.target = sound.cutoff_hz;
    }

    fn play_shift_click(&mut self) {
        self.pending_clicks.push(ShiftClick::standard());
    }

    fn resume(&mut self) {
        self.resumed = true;
    }

    /// Glides every parameter toward its target over `dt`.
    fn advance(&mut self, dt: Time) {
        let dt = dt.get::<second>().max(0.0);
        self.volume.advance(dt);
        self.low_hz.advance(dt);
        self.high_hz.advance(dt);
        self.cutoff_hz.advance(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn maps_idle_to_a_low_thump() {
        let sound = EngineSound::from_engine(1_200.0, Fraction::ZERO);
        assert_relative_eq!(sound.volume, RUNNING_VOLUME);
        assert_relative_eq!(sound.low_hz, 50.0);
        assert_relative_eq!(sound.high_hz, 20.0);
        assert_relative_eq!(sound.cutoff_hz, 320.0);
    }

    #[test]
    fn throttle_opens_the_filter() {
        let closed = EngineSound::from_engine(4_000.0, Fraction::ZERO);
        let open = EngineSound::from_engine(4_000.0, Fraction::ONE);
        assert_relative_eq!(open.cutoff_hz - closed.cutoff_hz, 1_000.0);
        assert_relative_eq!(open.low_hz, closed.low_hz);
    }

    #[test]
    fn mutes_below_threshold() {
        assert!(EngineSound::from_engine(99.0, Fraction::ONE).is_muted());
        assert!(!EngineSound::from_engine(100.0, Fraction::ZERO).is_muted());
    }

    #[test]
    fn voice_glides_instead_of_jumping() {
        let mut voice = SynthVoice::new();
        voice.set_engine_sound(6_000.0, Fraction::clamped(0.5));

        let before = voice.current();
        assert_relative_eq!(before.volume, 0.0);

        voice.advance(Time::new::<second>(0.05));
        let after = voice.current();
        let target = voice.target();

        // One oscillator time constant closes 1 - 1/e of the gap.
        let gap = target.low_hz - before.low_hz;
        assert_relative_eq!(
            after.low_hz,
            target.low_hz - gap * (-1.0_f64).exp(),
            epsilon = 1e-9
        );
        assert!(after.volume > 0.0 && after.volume < RUNNING_VOLUME);

        voice.advance(Time::new::<second>(5.0));
        assert_relative_eq!(voice.current().volume, RUNNING_VOLUME, epsilon = 1e-9);
    }

    #[test]
    fn muting_holds_the_tone() {
        let mut voice = SynthVoice::new();
        voice.set_engine_sound(3_000.0, Fraction::ZERO);
        voice.set_engine_sound(0.0, Fraction::ZERO);

        let target = voice.target();
        assert_relative_eq!(target.volume, 0.0);
        assert_relative_eq!(target.low_hz, 125.0);
    }

    #[test]
    fn queues_shift_clicks_until_drained() {
        let mut voice = SynthVoice::new();
        voice.play_shift_click();
        voice.play_shift_click();

        let clicks = voice.take_shift_clicks();
        assert_eq!(clicks, vec![ShiftClick::standard(); 2]);
        assert!(voice.take_shift_clicks().is_empty());
    }

    #[test]
    fn shift_click_sweeps_down() {
        let click = ShiftClick::standard();
        assert_relative_eq!(click.frequency_at(Time::new::<second>(0.0)), 100.0);
        assert_relative_eq!(
            click.frequency_at(Time::new::<second>(0.05)),
            10.0_f64.sqrt() * 10.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(click.frequency_at(Time::new::<second>(0.1)), 10.0, epsilon = 1e-9);
        assert_relative_eq!(click.gain_at(Time::new::<second>(0.0)), 0.2);
        assert_relative_eq!(click.gain_at(Time::new::<second>(0.2)), 0.0);
    }

    #[test]
    fn unit_sink_ignores_everything() {
        let mut sink = ();
        sink.set_engine_sound(5_000.0, Fraction::ONE);
        sink.play_shift_click();
        sink.resume();
        sink.advance(Time::new::<second>(1.0));
    }
}

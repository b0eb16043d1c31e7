use std::fmt;

use thiserror::Error;
use uom::si::{f64::Time, time::second};

/// A strictly positive, finite step size for fixed-step runs.
///
/// Host frames may legitimately produce a zero delta; a scheduled run may not,
/// since a zero step would never advance the clock.
///
/// ```
/// use thumper_sim::simulation::FrameDelta;
///
/// let dt = FrameDelta::per_second(60.0).unwrap();
/// assert!((dt.seconds() - 1.0 / 60.0).abs() < 1e-12);
/// assert!(FrameDelta::from_seconds(0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct FrameDelta(Time);

/// Error returned when constructing an invalid [`FrameDelta`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum FrameDeltaError {
    #[error("frame delta must be positive and finite, got {0} s")]
    NotPositive(f64),
}

impl FrameDelta {
    /// Constructs a `FrameDelta` from a [`Time`].
    ///
    /// # Errors
    ///
    /// Returns [`FrameDeltaError::NotPositive`] if the time is zero, negative,
    /// or not finite.
    pub fn from_time(time: Time) -> Result<Self, FrameDeltaError> {
        let seconds = time.get::<second>();
        if seconds.is_finite() && seconds > 0.0 {
            Ok(Self(time))
        } else {
            Err(FrameDeltaError::NotPositive(seconds))
        }
    }

    /// Constructs a `FrameDelta` from seconds.
    ///
    /// # Errors
    ///
    /// See [`FrameDelta::from_time`].
    pub fn from_seconds(seconds: f64) -> Result<Self, FrameDeltaError> {
        Self::from_time(Time::new::<second>(seconds))
    }

    /// The step of a display refreshing `hz` times per second.
    ///
    /// # Errors
    ///
    /// Returns [`FrameDeltaError::NotPositive`] if `hz` is not positive and finite.
    pub fn per_second(hz: f64) -> Result<Self, FrameDeltaError> {
        Self::from_seconds(1.0 / hz)
    }

    #[must_use]
    pub fn time(self) -> Time {
        self.0
    }

    #[must_use]
    pub fn seconds(self) -> f64 {
        self.0.get::<second>()
    }
}

impl TryFrom<Time> for FrameDelta {
    type Error = FrameDeltaError;
    fn try_from(time: Time) -> Result<Self, Self::Error> {
        Self::from_time(time)
    }
}

impl fmt::Display for FrameDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} s", self.seconds())
    }
}

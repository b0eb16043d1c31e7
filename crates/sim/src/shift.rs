use std::{convert::Infallible, fmt, str::FromStr};

use thiserror::Error;
use thumper_core::{Fraction, Model};

use crate::gear::Gear;

/// Minimum clutch lever travel required to change gear.
pub const SHIFT_CLUTCH_THRESHOLD: f64 = 0.8;

/// Direction of a shift request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftDirection {
    Up,
    Down,
}

impl fmt::Display for ShiftDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShiftDirection::Up => "up",
            ShiftDirection::Down => "down",
        })
    }
}

/// Parses `"up"` or `"down"`, the directions a dashboard button sends.
impl FromStr for ShiftDirection {
    type Err = ParseShiftDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(ShiftDirection::Up),
            "down" => Ok(ShiftDirection::Down),
            other => Err(ParseShiftDirectionError(other.to_owned())),
        }
    }
}

/// Error returned when a shift direction string is neither `"up"` nor `"down"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown shift direction {0:?}, expected \"up\" or \"down\"")]
pub struct ParseShiftDirectionError(String);

/// Input to the [`Gearbox`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftRequest {
    pub gear: Gear,
    pub clutch: Fraction,
    pub direction: ShiftDirection,
}

/// Why a shift request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftRejection {
    /// The clutch lever was not pulled far enough.
    ClutchNotPulled { clutch: Fraction },
}

impl ShiftRejection {
    /// The advisory shown to the rider.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ShiftRejection::ClutchNotPulled { .. } => "PULL CLUTCH TO SHIFT!",
        }
    }
}

/// Result of a shift request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftOutcome {
    /// The gear changed.
    Shifted { from: Gear, to: Gear },

    /// The request was accepted but the gearbox was already at its limit
    /// (up from fifth, down from neutral).
    Unchanged(Gear),

    /// The request was refused and the gear is unchanged.
    Rejected(ShiftRejection),
}

impl ShiftOutcome {
    /// Returns `true` if the gear actually changed.
    #[must_use]
    pub fn is_effective(self) -> bool {
        matches!(self, ShiftOutcome::Shifted { .. })
    }
}

/// The sequential gear-shift state machine.
///
/// Shifts are only allowed with the clutch pulled to at least
/// [`SHIFT_CLUTCH_THRESHOLD`]:
///
/// - Up: `N → 1 → 2 → 3 → 4 → 5`, and fifth stays fifth.
/// - Down: `5 → 4 → 3 → 2 → 1 → N`, and neutral stays neutral.
///
/// The gearbox is pure; callers apply the resulting gear and any side effects
/// (shift click, warning banner).
///
/// # Example
///
/// ```
/// use thumper_core::Fraction;
/// use thumper_sim::{
///     gear::Gear,
///     shift::{Gearbox, ShiftDirection, ShiftOutcome, ShiftRequest},
/// };
///
/// let request = ShiftRequest {
///     gear: Gear::Neutral,
///     clutch: Fraction::ONE,
///     direction: ShiftDirection::Up,
/// };
/// assert_eq!(
///     Gearbox::shift(request),
///     ShiftOutcome::Shifted { from: Gear::Neutral, to: Gear::First },
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Gearbox;

impl Gearbox {
    /// Evaluates a shift request.
    #[must_use]
    pub fn shift(request: ShiftRequest) -> ShiftOutcome {
        let ShiftRequest {
            gear,
            clutch,
            direction,
        } = request;

        if clutch.get() < SHIFT_CLUTCH_THRESHOLD {
            return ShiftOutcome::Rejected(ShiftRejection::ClutchNotPulled { clutch });
        }

        let next = match direction {
            ShiftDirection::Up => gear.up(),
            ShiftDirection::Down => gear.down(),
        };

        if next == gear {
            ShiftOutcome::Unchanged(gear)
        } else {
            ShiftOutcome::Shifted {
                from: gear,
                to: next,
            }
        }
    }
}

impl Model for Gearbox {
    type Input = ShiftRequest;
    type Output = ShiftOutcome;
    type Error = Infallible;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        Ok(Self::shift(*input))
    }
}

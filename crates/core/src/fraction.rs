use std::{cmp::Ordering, convert::TryFrom, ops::Mul};

use thiserror::Error;

/// A bounded scalar in `[0.0, 1.0]`.
///
/// Used for control positions (clutch lever travel, throttle opening), brake
/// pressure, and clutch engagement.
///
/// This type internally wraps an `f64` and guarantees the value is within `[0, 1]`.
/// Because of this invariant, `Fraction` implements [`Eq`] and [`Ord`] even
/// though raw `f64` does not.
///
/// # Examples
/// ```
/// use thumper_core::Fraction;
///
/// // Strict construction rejects out-of-range values.
/// let f = Fraction::new(0.25).unwrap();
/// assert_eq!(f.get(), 0.25);
/// assert!(Fraction::new(1.5).is_err());
///
/// // Clamped construction is for raw input devices.
/// assert_eq!(Fraction::clamped(1.5), Fraction::ONE);
///
/// // Multiply a scalar by a fraction (either order)
/// assert_eq!(f * 800.0, 200.0);
/// assert_eq!(800.0 * f, 200.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "f64", into = "f64")
)]
pub struct Fraction(f64);

impl Fraction {
    /// The lower bound, `0.0`.
    pub const ZERO: Self = Self(0.0);

    /// The upper bound, `1.0`.
    pub const ONE: Self = Self(1.0);

    /// Creates a `Fraction` if `value` is within `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`FractionError::NotFinite`] if `value` is `NaN` or infinite.
    /// Returns [`FractionError::OutOfRange`] if `value` is less than `0.0`
    /// or greater than `1.0`.
    pub fn new(value: f64) -> Result<Self, FractionError> {
        if !value.is_finite() {
            return Err(FractionError::NotFinite(value));
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(FractionError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Creates a `Fraction` by clamping `value` into `[0, 1]`.
    ///
    /// `NaN` maps to zero; infinities map to the nearest bound.
    #[must_use]
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            Self::ZERO
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// Returns the inner `f64`.
    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }

    /// Returns `1 - self`.
    #[must_use]
    pub fn complement(self) -> Self {
        Self(1.0 - self.0)
    }
}

impl TryFrom<f64> for Fraction {
    type Error = FractionError;
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Fraction::new(value)
    }
}

impl From<Fraction> for f64 {
    fn from(f: Fraction) -> Self {
        f.0
    }
}

impl Mul<f64> for Fraction {
    type Output = f64;
    fn mul(self, rhs: f64) -> Self::Output {
        self.0 * rhs
    }
}

impl Mul<Fraction> for f64 {
    type Output = f64;
    fn mul(self, rhs: Fraction) -> Self::Output {
        self * rhs.0
    }
}

// Sound because every constructor rejects or replaces NaN.
impl Eq for Fraction {}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Errors that can occur when constructing a [`Fraction`].
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum FractionError {
    /// Input was not finite.
    #[error("value is not finite: {0}")]
    NotFinite(f64),

    /// Input was outside the allowed range.
    #[error("value {0} is outside the range [0, 1]")]
    OutOfRange(f64),
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn valid_values() {
        assert_eq!(Fraction::new(0.0).unwrap(), Fraction::ZERO);
        assert_eq!(Fraction::new(1.0).unwrap(), Fraction::ONE);
        assert_eq!(Fraction::new(0.5).unwrap().get(), 0.5);
    }

    #[test]
    fn invalid_values() {
        assert!(matches!(
            Fraction::new(-0.01),
            Err(FractionError::OutOfRange(_))
        ));
        assert!(matches!(
            Fraction::new(1.01),
            Err(FractionError::OutOfRange(_))
        ));
        assert!(matches!(
            Fraction::new(f64::NAN),
            Err(FractionError::NotFinite(_))
        ));
        assert!(matches!(
            Fraction::new(f64::INFINITY),
            Err(FractionError::NotFinite(_))
        ));
    }

    #[test]
    fn clamping_handles_raw_input() {
        assert_eq!(Fraction::clamped(-3.0), Fraction::ZERO);
        assert_eq!(Fraction::clamped(7.0), Fraction::ONE);
        assert_eq!(Fraction::clamped(f64::NAN), Fraction::ZERO);
        assert_eq!(Fraction::clamped(f64::INFINITY), Fraction::ONE);
        assert_eq!(Fraction::clamped(f64::NEG_INFINITY), Fraction::ZERO);
        assert_eq!(Fraction::clamped(0.3).get(), 0.3);
    }

    #[test]
    fn complement() {
        assert_relative_eq!(Fraction::clamped(0.3).complement().get(), 0.7);
        assert_eq!(Fraction::ZERO.complement(), Fraction::ONE);
    }

    #[test]
    fn ordering() {
        let low = Fraction::clamped(0.1);
        let high = Fraction::clamped(0.8);
        assert!(low < high);
        assert_eq!(low.max(high), high);
    }

    #[test]
    fn mul_ergonomics() {
        let f = Fraction::new(0.25).unwrap();
        assert_eq!(f * 200.0, 50.0);
        assert_eq!(200.0 * f, 50.0);
    }

    #[cfg(feature = "serde-derive")]
    #[test]
    fn serde_rejects_out_of_range() {
        let f: Fraction = serde_json::from_str("0.75").unwrap();
        assert_eq!(f.get(), 0.75);
        assert!(serde_json::from_str::<Fraction>("1.75").is_err());
        assert_eq!(serde_json::to_string(&f).unwrap(), "0.75");
    }
}

use thumper_core::Fraction;

/// Rider control positions, as delivered by the presentation layer.
///
/// Values are raw: no filtering or smoothing is applied before the physics
/// tick reads them.
///
/// - `clutch`: lever travel, `0` released (engaged) to `1` fully pulled (disengaged).
/// - `throttle`: twist-grip opening, `0` closed to `1` wide open.
/// - `brake`: whether the brake is held.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Controls {
    pub clutch: Fraction,
    pub throttle: Fraction,
    pub brake: bool,
}

impl Controls {
    /// Returns `self` with the clutch clamped from `value`, keeping other fields unchanged.
    #[must_use]
    pub fn with_clutch(self, value: f64) -> Self {
        Self {
            clutch: Fraction::clamped(value),
            ..self
        }
    }

    /// Returns `self` with the throttle clamped from `value`, keeping other fields unchanged.
    #[must_use]
    pub fn with_throttle(self, value: f64) -> Self {
        Self {
            throttle: Fraction::clamped(value),
            ..self
        }
    }

    /// Returns `self` with the given brake state, keeping other fields unchanged.
    #[must_use]
    pub fn with_brake(self, brake: bool) -> Self {
        Self { brake, ..self }
    }
}

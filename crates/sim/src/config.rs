use serde::{Deserialize, Serialize};
use thiserror::Error;
use uom::si::{
    f64::{Force, Length, Mass},
    force::newton,
    length::meter,
    mass::kilogram,
};

use crate::gear::Gear;

/// Gear ratios for gears one through five.
///
/// Each ratio is the overall reduction from crankshaft to rear wheel.
/// Higher gears are taller, so ratios must strictly decrease.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GearRatios([f64; 5]);

impl GearRatios {
    /// Creates a ratio set from gears one through five.
    ///
    /// The ratios are checked by [`BikeConfig::validate`], not here.
    #[must_use]
    pub const fn new(ratios: [f64; 5]) -> Self {
        Self(ratios)
    }

    /// Returns the ratio for `gear`, or zero in neutral.
    #[must_use]
    pub fn ratio(&self, gear: Gear) -> f64 {
        match gear.number() {
            Some(n) => self.0[usize::from(n - 1)],
            None => 0.0,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut previous: Option<f64> = None;
        for (gear, &ratio) in (1_u8..).zip(self.0.iter()) {
            if !(ratio.is_finite() && ratio > 0.0) {
                return Err(ConfigError::InvalidRatio { gear, ratio });
            }
            if let Some(previous) = previous {
                if ratio >= previous {
                    return Err(ConfigError::RatiosNotDecreasing {
                        gear,
                        ratio,
                        previous,
                    });
                }
            }
            previous = Some(ratio);
        }
        Ok(())
    }
}

/// Physical and engine constants for a simulated bike.
///
/// The [`Default`] is a 150cc single-cylinder street bike.
/// Quantities deserialize from SI base units (kg, m, N), and missing fields
/// fall back to the defaults:
///
/// ```
/// use thumper_sim::config::BikeConfig;
///
/// let config: BikeConfig = toml::from_str("max_rpm = 12000.0\nredline = 11000.0").unwrap();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.idle_rpm, 1200.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BikeConfig {
    /// Engine speed ceiling; the tachometer's full-scale value.
    pub max_rpm: f64,
    pub idle_rpm: f64,
    /// Start of the red zone on the tachometer.
    pub redline: f64,
    pub gear_ratios: GearRatios,
    pub bike_mass: Mass,
    pub wheel_radius: Length,
    pub drag_coefficient: f64,
    /// Braking force at full brake pressure.
    pub brake_max_force: Force,
}

impl BikeConfig {
    /// The 150cc street bike.
    #[must_use]
    pub fn street_150() -> Self {
        Self {
            max_rpm: 10_000.0,
            idle_rpm: 1_200.0,
            redline: 9_000.0,
            gear_ratios: GearRatios::new([28.0, 19.0, 14.0, 11.0, 9.0]),
            bike_mass: Mass::new::<kilogram>(140.0),
            wheel_radius: Length::new::<meter>(0.3),
            drag_coefficient: 0.7,
            brake_max_force: Force::new::<newton>(800.0),
        }
    }

    /// Checks that the constants describe a drivable bike.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first violated constraint:
    /// non-positive or non-decreasing gear ratios, rpm limits out of order,
    /// a non-positive mass, wheel radius or brake force, or negative drag.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Self {
            max_rpm,
            idle_rpm,
            redline,
            gear_ratios,
            bike_mass,
            wheel_radius,
            drag_coefficient,
            brake_max_force,
        } = *self;

        let rpm_in_order = idle_rpm.is_finite()
            && max_rpm.is_finite()
            && 0.0 < idle_rpm
            && idle_rpm < redline
            && redline <= max_rpm;
        if !rpm_in_order {
            return Err(ConfigError::RpmOrder {
                idle: idle_rpm,
                redline,
                max: max_rpm,
            });
        }

        gear_ratios.validate()?;

        positive("bike_mass", bike_mass.get::<kilogram>())?;
        positive("wheel_radius", wheel_radius.get::<meter>())?;
        positive("brake_max_force", brake_max_force.get::<newton>())?;

        if !(drag_coefficient.is_finite() && drag_coefficient >= 0.0) {
            return Err(ConfigError::InvalidDrag(drag_coefficient));
        }

        Ok(())
    }
}

impl Default for BikeConfig {
    fn default() -> Self {
        Self::street_150()
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

/// Errors returned by [`BikeConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("expected 0 < idle_rpm ({idle}) < redline ({redline}) <= max_rpm ({max})")]
    RpmOrder { idle: f64, redline: f64, max: f64 },

    #[error("gear {gear} ratio must be positive and finite, got {ratio}")]
    InvalidRatio { gear: u8, ratio: f64 },

    #[error("gear {gear} ratio {ratio} must be smaller than the gear below it ({previous})")]
    RatiosNotDecreasing { gear: u8, ratio: f64, previous: f64 },

    #[error("{name} must be positive and finite, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("drag coefficient must be non-negative and finite, got {0}")]
    InvalidDrag(f64),
}

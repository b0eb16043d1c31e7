use thumper_core::Fraction;

use crate::{config::BikeConfig, controls::Controls, gear::Gear, state::DrivetrainState};

/// Telemetry read by the presentation layer each frame.
///
/// Rpm and speed are rounded for display; `gear` renders as `N` or `1`–`5`.
/// `warning` is empty when no advisory is showing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dashboard {
    pub rpm: u32,
    pub speed_kmh: u32,
    pub gear: Gear,
    pub engine_on: bool,
    pub warning: &'static str,
    pub clutch: Fraction,
    pub throttle: Fraction,
    pub brake: bool,
    /// `true` when the tachometer needle is in the red zone.
    pub in_redline: bool,
}

impl Dashboard {
    /// Builds the display values from committed state and the current controls.
    #[must_use]
    pub fn new(
        config: &BikeConfig,
        state: &DrivetrainState,
        controls: &Controls,
        warning: &'static str,
    ) -> Self {
        Self {
            rpm: round_to_u32(state.rpm),
            speed_kmh: round_to_u32(state.speed_kmh()),
            gear: state.gear,
            engine_on: state.engine_on,
            warning,
            clutch: controls.clutch,
            throttle: controls.throttle,
            brake: controls.brake,
            in_redline: state.rpm >= config.redline,
        }
    }
}

// Display values are non-negative and far below `u32::MAX`; the cast saturates otherwise.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_to_u32(value: f64) -> u32 {
    value.round() as u32
}

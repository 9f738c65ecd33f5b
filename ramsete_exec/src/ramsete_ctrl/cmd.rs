//! Drive signal output by the follower

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The wheel speed demand for a differential drivetrain.
///
/// One signal is produced per cycle; signals carry no identity from cycle to
/// cycle.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct DriveSignal {
    /// Left wheel speed demand.
    ///
    /// Units: meters/second
    pub left_ms: f64,

    /// Right wheel speed demand.
    ///
    /// Units: meters/second
    pub right_ms: f64,

    /// If true the drivetrain shall engage its brake mode rather than coast.
    pub brake: bool
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveSignal {

    /// The zero demand, bringing the vehicle to a coasting stop.
    pub fn stop() -> Self {
        Self {
            left_ms: 0.0,
            right_ms: 0.0,
            brake: false
        }
    }

    /// Build a signal from body linear and angular rates.
    ///
    /// The left and right wheels each travel at the body speed offset by
    /// half the wheel base times the turn rate.
    pub fn from_body_rates(
        lin_vel_ms: f64,
        ang_vel_rads: f64,
        wheel_base_m: f64
    ) -> Self {
        Self {
            left_ms: lin_vel_ms - wheel_base_m * ang_vel_rads / 2.0,
            right_ms: lin_vel_ms + wheel_base_m * ang_vel_rads / 2.0,
            brake: false
        }
    }

    /// Recover the body linear and angular rates from the wheel speeds.
    ///
    /// This is the exact inverse of [`DriveSignal::from_body_rates`] for the
    /// same wheel base.
    pub fn to_body_rates(&self, wheel_base_m: f64) -> (f64, f64) {
        (
            (self.left_ms + self.right_ms) / 2.0,
            (-self.left_ms + self.right_ms) / wheel_base_m
        )
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

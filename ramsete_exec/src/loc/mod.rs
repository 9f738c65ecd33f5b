//! # Localisation module
//!
//! This module provides the pose types used across the software. There is
//! no odometry source of its own - the pose estimate is supplied to the
//! follower by its caller each cycle, either from real localisation or from
//! the kinematic model when running closed-loop in simulation.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The current pose (position and heading in the World frame) of the
/// vehicle.
///
/// The heading is the angle to the positive World X axis, counter-clockwise
/// positive. It is deliberately kept as a plain accumulating angle rather
/// than an attitude quaternion - the follower's heading error is a raw
/// difference of headings, and wrapping the angle would introduce 2*pi jumps
/// into that error on long turning trajectories.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// The position in the World frame.
    ///
    /// Units: meters
    pub position_m: Vector2<f64>,

    /// The heading in the World frame.
    ///
    /// Units: radians
    pub heading_rad: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {

    /// Create a new pose from planar coordinates and a heading.
    pub fn from_planar(x_m: f64, y_m: f64, heading_rad: f64) -> Self {
        Self {
            position_m: Vector2::new(x_m, y_m),
            heading_rad
        }
    }

    /// Get the unit vector pointing in the direction of the heading (in 2D).
    pub fn forward2(&self) -> Vector2<f64> {
        Vector2::new(self.heading_rad.cos(), self.heading_rad.sin())
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::from_planar(0.0, 0.0, 0.0)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

//! # Trajectory module
//!
//! This module defines the reference trajectory tracked by the follower.
//!
//! A trajectory is a time-ordered sequence of segments, each giving a target
//! position, heading, feed-forward linear speed and the time step to the
//! next segment. Trajectories are produced offline by a planning tool
//! (spline fitting and velocity profiling are not this software's concern)
//! and consumed here as read-only input, normally loaded from the planner's
//! JSON output.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use std::path::Path;

// Internal
use crate::loc::Pose;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One sample of the reference trajectory.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct TrajSegment {
    /// Target position X coordinate in the World frame.
    ///
    /// Units: meters
    pub x_m: f64,

    /// Target position Y coordinate in the World frame.
    ///
    /// Units: meters
    pub y_m: f64,

    /// Target heading in the World frame.
    ///
    /// Units: radians
    pub heading_rad: f64,

    /// Feed-forward linear speed at this sample.
    ///
    /// Units: meters/second
    pub velocity_ms: f64,

    /// Time step between this sample and the next one.
    ///
    /// Units: seconds
    pub dt_s: f64
}

/// A reference trajectory for the follower to track.
///
/// Immutable once constructed - all constructors validate the segments so
/// that downstream code can index and divide without further checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trajectory {
    segments: Vec<TrajSegment>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while building or loading a trajectory.
#[derive(Debug, thiserror::Error)]
pub enum TrajError {
    #[error("Cannot load the trajectory file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Cannot parse the trajectory file: {0}")]
    ParseError(serde_json::Error),

    #[error("The trajectory contains no segments")]
    Empty,

    #[error("Segment {0} has a non-positive time step ({1} s)")]
    NonPositiveDt(usize, f64),

    #[error("Segment {0} contains a non-finite value")]
    NonFinite(usize)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrajSegment {

    /// The pose targeted by this segment.
    pub fn pose(&self) -> Pose {
        Pose::from_planar(self.x_m, self.y_m, self.heading_rad)
    }
}

impl Trajectory {

    /// Build a trajectory from a vector of segments.
    pub fn from_segments(segments: Vec<TrajSegment>) -> Result<Self, TrajError> {
        validate_segments(&segments)?;

        Ok(Self { segments })
    }

    /// Load a trajectory from a planner JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, TrajError> {
        let traj_str = std::fs::read_to_string(path)
            .map_err(TrajError::FileLoadError)?;

        let traj: Trajectory = serde_json::from_str(&traj_str)
            .map_err(TrajError::ParseError)?;

        validate_segments(&traj.segments)?;

        Ok(traj)
    }

    /// Get the segment at the given index, or `None` if the index is beyond
    /// the end of the trajectory.
    pub fn get(&self, index: usize) -> Option<&TrajSegment> {
        self.segments.get(index)
    }

    /// Get the number of segments in the trajectory.
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// Get the total duration of the trajectory, the sum of all segment
    /// time steps.
    pub fn total_duration_s(&self) -> f64 {
        self.segments.iter().map(|s| s.dt_s).sum()
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Check that the segments form a usable trajectory.
fn validate_segments(segments: &[TrajSegment]) -> Result<(), TrajError> {
    if segments.is_empty() {
        return Err(TrajError::Empty);
    }

    for (i, seg) in segments.iter().enumerate() {
        if !(seg.x_m.is_finite()
            && seg.y_m.is_finite()
            && seg.heading_rad.is_finite()
            && seg.velocity_ms.is_finite()
            && seg.dt_s.is_finite())
        {
            return Err(TrajError::NonFinite(i));
        }

        if seg.dt_s <= 0.0 {
            return Err(TrajError::NonPositiveDt(i, seg.dt_s));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn seg(x_m: f64, dt_s: f64) -> TrajSegment {
        TrajSegment {
            x_m,
            y_m: 0.0,
            heading_rad: 0.0,
            velocity_ms: 1.0,
            dt_s
        }
    }

    #[test]
    fn test_valid_trajectory() {
        let traj = Trajectory::from_segments(
            vec![seg(0.0, 0.1), seg(0.1, 0.1), seg(0.2, 0.05)]
        ).unwrap();

        assert_eq!(traj.num_segments(), 3);
        assert!((traj.total_duration_s() - 0.25).abs() < 1e-12);
        assert_eq!(traj.get(1).unwrap().x_m, 0.1);
        assert!(traj.get(3).is_none());
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            Trajectory::from_segments(vec![]),
            Err(TrajError::Empty)
        ));
    }

    #[test]
    fn test_bad_dt_rejected() {
        assert!(matches!(
            Trajectory::from_segments(vec![seg(0.0, 0.1), seg(0.1, 0.0)]),
            Err(TrajError::NonPositiveDt(1, _))
        ));

        assert!(matches!(
            Trajectory::from_segments(vec![seg(0.0, -0.1)]),
            Err(TrajError::NonPositiveDt(0, _))
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(matches!(
            Trajectory::from_segments(vec![seg(f64::NAN, 0.1)]),
            Err(TrajError::NonFinite(0))
        ));
    }

    #[test]
    fn test_parse_planner_output() {
        let json = r#"{
            "segments": [
                {"x_m": 0.0, "y_m": 0.0, "heading_rad": 0.0, "velocity_ms": 1.0, "dt_s": 0.02},
                {"x_m": 0.02, "y_m": 0.0, "heading_rad": 0.0, "velocity_ms": 1.0, "dt_s": 0.02}
            ]
        }"#;

        let traj: Trajectory = serde_json::from_str(json).unwrap();
        assert_eq!(traj.num_segments(), 2);
        assert_eq!(traj.get(1).unwrap().x_m, 0.02);
    }
}

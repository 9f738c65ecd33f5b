//! Kinematic model parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the kinematic model.
#[derive(Deserialize, Debug, Clone)]
pub struct Params {

    /// Lateral distance between the left and right wheel centres.
    ///
    /// Units: meters
    pub wheel_base_m: f64,

    /// Integration method used to advance the pose.
    pub method: IntegrationMethod,

    /// Optional multiplicative jitter applied to each time step.
    pub dt_jitter: Option<DtJitter>,

    /// Seed for the jitter random source. A seed of 0 draws from entropy
    /// instead, giving a different run every time.
    pub seed: u64
}

/// Uniform multiplicative jitter on the integration time step.
///
/// Each step's nominal time step is multiplied by a factor sampled
/// uniformly from `[min_factor, max_factor]`.
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct DtJitter {
    /// Lower bound of the jitter factor. Must be positive.
    pub min_factor: f64,

    /// Upper bound of the jitter factor. Must not be below the lower bound.
    pub max_factor: f64
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Selects how the pose is advanced over a time step.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum IntegrationMethod {
    /// Semi-implicit Euler with the heading updated before the position:
    /// the whole position step is applied along the post-update heading.
    ///
    /// This is how the reference drivetrain model behaves and is the
    /// method to use when comparing against it, at the cost of a small
    /// drift on curved motion.
    HeadingFirstEuler,

    /// Closed-form motion along the circular arc the wheel speeds
    /// describe. Drift-free, but will not reproduce reference traces.
    ExactArc
}

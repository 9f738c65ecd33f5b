//! # Kinematic model module
//!
//! The kinematic model advances a pose under a drive signal using unicycle
//! kinematics. It stands in for the real drivetrain and localisation chain
//! when running closed-loop in simulation, and is the reference model the
//! follower is tested against.
//!
//! Two integration methods are provided. The default advances the heading
//! first and then applies the whole position step along the new heading,
//! matching the reference drivetrain model exactly; the alternative moves
//! the pose along the true circular arc. See [`IntegrationMethod`] for the
//! trade-off.
//!
//! The model can apply a multiplicative jitter to each time step to emulate
//! an imperfect control period. The jitter is drawn from a random source
//! owned by the model and seeded from the parameter file, so simulation
//! runs are reproducible.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Potential errors that could occur during initialisation of the module.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Failed to load the parameter file: {0}")]
    ParamLoadError(#[from] util::params::LoadError),

    #[error("The wheel base must be positive, got {0} m")]
    NonPositiveWheelBase(f64),

    #[error("Invalid time step jitter range [{0}, {1}]")]
    InvalidJitterRange(f64, f64)
}

//! # Ramsete follower module
//!
//! The follower keeps the vehicle on the reference trajectory. It is a
//! nonlinear tracking law which actively corrects longitudinal, lateral and
//! angular error by asymptotically stabilising the error at zero, rather
//! than a pair of independent PID loops.
//!
//! The link to the paper is here:
//! https://www.dis.uniroma1.it/~labrob/pub/papers/Ramsete01.pdf
//!
//! Each cycle the follower is given the latest pose estimate and produces a
//! left/right wheel speed demand from the current trajectory segment, then
//! advances to the next segment. Once every segment has been consumed the
//! follower holds a stop demand indefinitely.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cmd;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use cmd::*;
pub use params::Params;
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

    #[error("The correction gain b must be positive, got {0}")]
    NonPositiveGain(f64)
}

/// Potential errors that can occur during operation of the module.
#[derive(Debug, thiserror::Error)]
pub enum RamseteCtrlError {
    /// A trajectory is already executing. This error occurs when attempting
    /// to load a new trajectory before the current one has finished.
    #[error("A trajectory is already being executed")]
    TrajAlreadyLoaded,

    /// No trajectory has been loaded yet.
    #[error("No trajectory has been loaded")]
    NoTrajLoaded
}

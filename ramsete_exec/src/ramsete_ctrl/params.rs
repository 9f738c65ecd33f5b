//! Ramsete follower parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the Ramsete follower.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct Params {

    /// Correction gain.
    ///
    /// Must be greater than zero. Larger values pull the vehicle back onto
    /// the trajectory more aggressively.
    pub b: f64,

    /// Damping factor.
    ///
    /// Should be in [0, 1). Values outside the range still compute but the
    /// convergence guarantee of the law no longer holds.
    pub zeta: f64,

    /// Lateral distance between the left and right wheel centres.
    ///
    /// Units: meters
    pub wheel_base_m: f64
}

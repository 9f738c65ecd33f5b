//! # Follower library.
//!
//! This library holds the modules used by the follower executable, so that
//! other crates in the workspace can drive the follower without going
//! through the binary.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Kinematic model - advances a pose under a drive signal, standing in for real drivetrain
/// feedback in simulation
pub mod kin_model;

/// Localisation module - pose types giving the vehicle an idea of where it is in the world
pub mod loc;

/// Ramsete follower module - keeps the vehicle on the given trajectory
pub mod ramsete_ctrl;

/// Trajectory module - the reference trajectory the follower tracks
pub mod traj;

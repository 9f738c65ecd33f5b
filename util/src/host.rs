//! Host environment utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::PathBuf;
use thiserror::Error;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Name of the environment variable which points at the root of the software
/// directory tree. Parameter files and session directories are resolved
/// relative to this root.
pub const SW_ROOT_ENV_VAR: &str = "RAMSETE_SW_ROOT";

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with the host environment.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("The software root environment variable (RAMSETE_SW_ROOT) is not set")]
    SwRootNotSet
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the software root directory from the environment.
pub fn get_sw_root() -> Result<PathBuf, HostError> {
    std::env::var(SW_ROOT_ENV_VAR)
        .map(PathBuf::from)
        .map_err(|_| HostError::SwRootNotSet)
}

//! Generic parameters functions
//!
//! Each module keeps its tunable values in a TOML file under the `params`
//! directory of the software root, deserialised into the module's own
//! `Params` struct at init.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::de::DeserializeOwned;
use std::fs::read_to_string;
use std::path::Path;
use thiserror::Error;
use toml;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a parameter file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The software root environment variable (RAMSETE_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot load the parameter file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Cannot read the parameter file: {0}")]
    DeserialiseError(toml::de::Error)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load a parameter file.
///
/// The file path is relative to the "<root>/params" directory.
pub fn load<P>(param_file_path: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned
{
    // Get the params dir
    let mut path = crate::host::get_sw_root()
        .map_err(|_| LoadError::SwRootNotSet)?;
    path.push("params");
    path.push(param_file_path);

    load_from_path(path)
}

/// Load a parameter file from an absolute path.
pub fn load_from_path<P, Q>(path: Q) -> Result<P, LoadError>
where
    P: DeserializeOwned,
    Q: AsRef<Path>
{
    // Load the file into a string
    let params_str = read_to_string(path)
        .map_err(LoadError::FileLoadError)?;

    // Parse the string into the parameter struct
    toml::from_str(params_str.as_str())
        .map_err(LoadError::DeserialiseError)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct TestParams {
        gain: f64,
        name: String
    }

    #[test]
    fn test_load_from_path() {
        let dir = std::env::temp_dir();
        let path = dir.join("util_params_test.toml");
        std::fs::write(&path, "gain = 2.5\nname = \"test\"\n").unwrap();

        let params: TestParams = load_from_path(&path).unwrap();
        assert_eq!(params.gain, 2.5);
        assert_eq!(params.name, "test");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_bad_file_is_error() {
        let result: Result<TestParams, LoadError> =
            load_from_path("/nonexistent/params.toml");
        assert!(matches!(result, Err(LoadError::FileLoadError(_))));
    }
}

//! Environment file loading.

use crate::error::{Result, TauridockError};
use std::path::Path;

/// Reads `KEY=VALUE` pairs from a dotenv file, in file order.
///
/// The variables are forwarded to build containers only; the current
/// process environment is left untouched.
pub fn load_env_file(path: &Path) -> Result<Vec<(String, String)>> {
    let iter = dotenvy::from_path_iter(path).map_err(|e| {
        TauridockError::Configuration(format!(
            "Failed to read env file {}: {}",
            path.display(),
            e
        ))
    })?;

    iter.map(|item| {
        item.map_err(|e| {
            TauridockError::Configuration(format!(
                "Invalid entry in env file {}: {}",
                path.display(),
                e
            ))
        })
    })
    .collect()
}

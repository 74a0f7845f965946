//! Path Utilities
//!
//! Resolution of the per-user `~/.cloudprint/` directory.

use std::path::PathBuf;

use super::error::CloudPrintError;
use super::result::CloudPrintResult;

/// Get the base directory (`~/.cloudprint/`)
fn cloudprint_dir() -> CloudPrintResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CloudPrintError::configuration("Could not determine home directory"))?;
    Ok(home.join(".cloudprint"))
}

/// Get a path within the base directory
fn cloudprint_path(relative_path: &str) -> CloudPrintResult<PathBuf> {
    Ok(cloudprint_dir()?.join(relative_path))
}

/// Get the default configuration file path
pub fn default_config_path() -> CloudPrintResult<PathBuf> {
    cloudprint_path("config.json")
}

//! Path management for letterpad configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/letterpad/         # Config directory (platform config dir)
//! └── config.toml              # Application configuration
//! ```

use letterpad_core::LetterError;
use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for LetterError {
    fn from(err: PathError) -> Self {
        LetterError::config(err.to_string())
    }
}

/// Resolves letterpad's locations on the current platform.
pub struct LetterpadPaths;

impl LetterpadPaths {
    const APP_DIR: &'static str = "letterpad";

    /// Returns the letterpad configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: e.g. `~/.config/letterpad/` on Linux
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(Self::APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}

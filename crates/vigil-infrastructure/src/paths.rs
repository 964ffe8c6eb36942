//! Unified path management for vigil data files.
//!
//! Session documents and the service configuration live under one base
//! directory resolved from the platform's conventional locations, so every
//! storage mechanism agrees on where data lives.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/vigil/             # Config directory
//! └── config.toml              # Service configuration
//!
//! ~/.local/share/vigil/        # Data directory
//! └── sessions/                # One TOML document per session
//! ```

use std::path::PathBuf;

use vigil_core::error::{Result, VigilError};

/// Unified path management for vigil.
pub struct VigilPaths;

impl VigilPaths {
    /// Returns the vigil configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to the config directory (e.g. `~/.config/vigil/`)
    /// - `Err(_)`: The platform config directory could not be determined
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("vigil"))
            .ok_or_else(|| VigilError::config("Cannot determine config directory"))
    }

    /// Returns the vigil data directory, where session documents are stored.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to the data directory (e.g. `~/.local/share/vigil/`)
    /// - `Err(_)`: The platform data directory could not be determined
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join("vigil"))
            .ok_or_else(|| VigilError::config("Cannot determine data directory"))
    }

    /// Returns the default configuration file path.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}

//! Service configuration.
//!
//! A small TOML configuration covering the concerns outside the domain
//! itself: where session documents are stored and the default page size for
//! session listings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::paths::VigilPaths;
use vigil_core::error::Result;

/// Default page size for session listings when the caller gives none.
pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// Configuration for the vigil service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VigilConfig {
    /// Base directory for session storage. When unset, the platform data
    /// directory is used.
    pub data_dir: Option<PathBuf>,
    /// Default `limit` for session listings.
    pub default_page_limit: usize,
}

impl Default for VigilConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl VigilConfig {
    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the defaults; a present but malformed file is
    /// an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Loads configuration from the default platform location.
    pub fn load_default() -> Result<Self> {
        Self::load(VigilPaths::config_file()?)
    }

    /// Resolves the effective session storage directory.
    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => VigilPaths::data_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VigilConfig::default();
        assert_eq!(config.default_page_limit, 10);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let config = VigilConfig::load("/nonexistent/vigil/config.toml").unwrap();
        assert_eq!(config, VigilConfig::default());
    }

    #[test]
    fn test_parse_partial_config() {
        let config: VigilConfig = toml::from_str("default_page_limit = 25").unwrap();
        assert_eq!(config.default_page_limit, 25);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_parse_data_dir() {
        let config: VigilConfig = toml::from_str("data_dir = \"/var/lib/vigil\"").unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/vigil")));
        assert_eq!(
            config.resolved_data_dir().unwrap(),
            PathBuf::from("/var/lib/vigil")
        );
    }
}

//! Path management for Shopkeeper
//!
//! Provides XDG-compliant path resolution for configuration, data and the
//! audit log.
//!
//! ## Path Resolution Order
//!
//! 1. `SHOPKEEPER_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/shopkeeper` or `~/.config/shopkeeper`
//! 3. Windows: `%APPDATA%\shopkeeper`

use std::path::PathBuf;

use crate::error::ShopError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "SHOPKEEPER_DATA_DIR";

/// Manages all paths used by Shopkeeper
#[derive(Debug, Clone)]
pub struct ShopPaths {
    /// Base directory for all Shopkeeper data
    base_dir: PathBuf,
}

impl ShopPaths {
    /// Create a new ShopPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, ShopError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create ShopPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/shopkeeper/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory holding one JSON file per storage key
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), ShopError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| ShopError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| ShopError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, ShopError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME").map_err(|_| {
                ShopError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("shopkeeper"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, ShopError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| ShopError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("shopkeeper"))
}

//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, ErrorCode, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project-local config file names, checked in order.
const LOCAL_CANDIDATES: [&str; 2] = [".promptvault.toml", "promptvault.toml"];

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed settings
    pub schema: ConfigSchema,
    /// File the settings came from, if any
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit path must exist. Without one the standard locations are
    /// searched and defaults are used when none is present.
    ///
    /// # Errors
    /// Missing explicit file, unreadable or malformed TOML, or values out of
    /// range.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };

        let schema = match &config_path {
            Some(p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };

        schema.validate().to_result().map_err(|e| {
            Error::new(ErrorCode::ConfigValidationError, e.message)
                .with_context(describe(config_path.as_deref()))
        })?;

        debug!(path = ?config_path, "Loaded configuration");

        Ok(Self {
            schema,
            path: config_path,
        })
    }
}

fn describe(path: Option<&Path>) -> String {
    path.map_or_else(
        || "Built-in defaults".to_string(),
        |p| format!("Config file {}", p.display()),
    )
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    LOCAL_CANDIDATES
        .into_iter()
        .map(PathBuf::from)
        .chain(dirs::config_dir().map(|dir| dir.join("promptvault").join("config.toml")))
        .find(|candidate| candidate.is_file())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read config file {}: {e}", path.display())).with_source(e)
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::new(
            ErrorCode::ConfigParseError,
            format!("Failed to parse config file {}: {e}", path.display()),
        )
        .with_source(e)
    })
}

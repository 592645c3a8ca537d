//! Service configuration via `roster.toml`
//!
//! Deployment policy lives in a small config file next to the
//! service. On first start a default `roster.toml` is created; to
//! change settings, edit the file and restart.

use serde::{Deserialize, Serialize};
use std::path::Path;

use roster_core::{RosterError, RosterResult};

/// Config file name placed in the service working directory.
pub const CONFIG_FILE_NAME: &str = "roster.toml";

/// Service configuration loaded from `roster.toml`.
///
/// # Example
///
/// ```toml
/// # Page-size ceiling for list queries. Unset = unbounded.
/// # max_query_limit = 500
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Largest page size a list query may request. `None` (the
    /// default) leaves requested limits unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_query_limit: Option<u64>,
}

impl RosterConfig {
    /// Check the loaded values for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_query_limit` is set to zero, which
    /// would reject every query.
    pub fn validate(&self) -> RosterResult<()> {
        if self.max_query_limit == Some(0) {
            return Err(RosterError::validation(
                "max_query_limit must be at least 1 in roster.toml".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# RosterDB service configuration
#
# Page-size ceiling for list queries. Requests asking for a larger
# limit are rejected. Leave commented out for no ceiling.
# max_query_limit = 500
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, cannot be parsed,
    /// or fails validation.
    pub fn from_file(path: &Path) -> RosterResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RosterError::store_unavailable(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: RosterConfig = toml::from_str(&content).map_err(|e| {
            RosterError::validation(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        // Validate the loaded values eagerly
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> RosterResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                RosterError::store_unavailable(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> RosterResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            RosterError::store_unavailable(format!("Failed to serialize config: {}", e))
        })?;
        std::fs::write(path, content).map_err(|e| {
            RosterError::store_unavailable(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

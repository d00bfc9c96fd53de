//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use svgsift::{SiftError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for SiftError {
    fn from(err: ConfigError) -> Self {
        SiftError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (svgsift/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, SiftError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("svgsift/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "svgsift", "svgsift") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(
                path = system_config.display().to_string();
                "Loading configuration from system path"
            );
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, SiftError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_explicit_config() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[fetch]\nenforce_cors = false\ntimeout_secs = 5\nuser_agent = \"svgsift-test\"\n",
        )
        .expect("Failed to write config");

        let config = load_config(Some(&path)).expect("valid config");
        assert!(!config.fetch().enforce_cors());
        assert_eq!(config.fetch().timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.fetch().user_agent(), Some("svgsift-test"));
    }

    #[test]
    fn test_missing_explicit_config() {
        let dir = tempdir().expect("Failed to create temp directory");
        let err = load_config(Some(dir.path().join("absent.toml"))).expect_err("missing file");
        assert!(matches!(err, SiftError::Config(_)));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[fetch]\nenforce_cors = \"sometimes\"\n")
            .expect("Failed to write config");

        let err = load_config(Some(&path)).expect_err("wrong type");
        assert!(err.to_string().starts_with("Configuration error: Failed to parse TOML"));
    }
}

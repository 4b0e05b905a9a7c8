//! Configuration file discovery and loading.
//!
//! Settings come from three layers, later overriding earlier:
//!
//! 1. Built-in defaults
//! 2. User config (`~/.veman/config.yml`, or `VEMAN_CONFIG`)
//! 3. Environment variables (`VEMAN_ENV_DIR`, `VEMAN_PYTHON`) and CLI flags

use crate::config::schema::VemanConfig;
use crate::config::{ENV_CONFIG, ENV_PYTHON};
use crate::error::{Result, VemanError};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory under the home directory holding veman's files.
const VEMAN_DIR: &str = ".veman";

/// Default registry root, relative to [`VEMAN_DIR`].
const DEFAULT_ENV_SUBDIR: &str = "env";

/// Path of the user config file, honoring `VEMAN_CONFIG`.
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(ENV_CONFIG) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    dirs::home_dir().map(|home| home.join(VEMAN_DIR).join("config.yml"))
}

/// Default registry root: `~/.veman/env`.
pub fn default_registry_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("~"))
        .join(VEMAN_DIR)
        .join(DEFAULT_ENV_SUBDIR)
}

/// Load a config file; a missing file yields defaults.
pub fn load_config_file(path: &Path) -> Result<VemanConfig> {
    if !path.exists() {
        tracing::debug!("No config file at {}", path.display());
        return Ok(VemanConfig::default());
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(VemanConfig::default());
    }

    serde_yaml::from_str(&content).map_err(|e| VemanError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load the user config and apply environment overrides.
pub fn load_config() -> Result<VemanConfig> {
    let mut config = match config_path() {
        Some(path) => load_config_file(&path)?,
        None => VemanConfig::default(),
    };

    if let Ok(python) = std::env::var(ENV_PYTHON) {
        if !python.is_empty() {
            config.python = python;
        }
    }

    Ok(config)
}

/// Resolve the registry root.
///
/// `override_root` is the `--env-dir` flag or `VEMAN_ENV_DIR`; when set it
/// is used exclusively. Otherwise the config's `env_dir`, then the default.
pub fn resolve_registry_root(override_root: Option<&Path>, config: &VemanConfig) -> PathBuf {
    if let Some(root) = override_root.filter(|p| !p.as_os_str().is_empty()) {
        return expand_home(root);
    }
    if let Some(root) = &config.env_dir {
        return expand_home(root);
    }
    default_registry_root()
}

/// Expand a leading `~` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

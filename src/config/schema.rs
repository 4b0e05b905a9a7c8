//! Configuration schema definitions for veman.
//!
//! These structs map to the optional YAML file at `~/.veman/config.yml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for `config.yml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VemanConfig {
    /// Interpreter used to create and upgrade environments.
    pub python: String,

    /// Registry root (overridden by `VEMAN_ENV_DIR`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_dir: Option<PathBuf>,

    /// Default creation options.
    pub defaults: CreateDefaults,

    /// Packages the installer keeps current inside every environment.
    pub core_packages: Vec<String>,
}

impl Default for VemanConfig {
    fn default() -> Self {
        Self {
            python: default_python(),
            env_dir: None,
            defaults: CreateDefaults::default(),
            core_packages: default_core_packages(),
        }
    }
}

/// Defaults applied to `create` and `temp` when no flag is given.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CreateDefaults {
    /// Give environments access to the system site-packages.
    #[serde(skip_serializing_if = "is_false")]
    pub system_site_packages: bool,

    /// Skip bootstrapping the installer.
    #[serde(skip_serializing_if = "is_false")]
    pub without_pip: bool,
}

fn default_python() -> String {
    "python3".to_string()
}

fn default_core_packages() -> Vec<String> {
    vec!["pip".to_string(), "setuptools".to_string()]
}

fn is_false(b: &bool) -> bool {
    !*b
}

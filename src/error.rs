//! Error types for veman operations.
//!
//! This module defines [`VemanError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `VemanError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `VemanError::Other`) for unexpected errors
//! - All errors should provide actionable messages for users

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Core error type for veman operations.
#[derive(Debug, Error)]
pub enum VemanError {
    /// Named environment does not exist in the registry root.
    #[error("Environment '{name}' not found")]
    NotFound { name: String },

    /// Environment directory already exists and overwrite was not requested.
    #[error("Environment '{name}' already exists (use --overwrite to replace it)")]
    AlreadyExists { name: String },

    /// Refused to delete the environment active in the calling shell.
    #[error("Environment '{name}' is active in this shell; deactivate it first")]
    EnvironmentActive { name: String },

    /// Environment name contains disallowed characters.
    #[error("Invalid environment name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// The creation primitive or the installer exited non-zero.
    #[error("Command failed with exit code {code:?}: {command}")]
    SubprocessFailure {
        command: String,
        code: Option<i32>,
        output: String,
    },

    /// The interpreter cannot replace the one an environment was built with.
    #[error("Interpreter {current} cannot upgrade environment '{name}' built with {recorded}")]
    IncompatibleRuntimeVersion {
        name: String,
        recorded: String,
        current: String,
    },

    /// Filesystem access was refused.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Failed to parse a YAML file (config or environment metadata).
    #[error("Failed to parse {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// The host platform or shell is not supported.
    #[error("Unsupported platform: {0}")]
    Unsupported(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VemanError {
    /// Convert an IO error on `path`, keeping permission failures distinct.
    pub fn from_io(err: std::io::Error, path: &Path) -> Self {
        if err.kind() == std::io::ErrorKind::PermissionDenied {
            Self::PermissionDenied {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io(err)
        }
    }

    /// Diagnostic output captured from a failed subprocess, if any.
    pub fn diagnostic_output(&self) -> Option<&str> {
        match self {
            Self::SubprocessFailure { output, .. } if !output.trim().is_empty() => {
                Some(output.as_str())
            }
            _ => None,
        }
    }
}

/// Result type alias for veman operations.
pub type Result<T> = std::result::Result<T, VemanError>;

/// Attach the path being operated on to an IO result.
pub(crate) trait IoResultExt<T> {
    fn at(self, path: &Path) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn at(self, path: &Path) -> Result<T> {
        self.map_err(|e| VemanError::from_io(e, path))
    }
}

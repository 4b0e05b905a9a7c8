//! The host runtime: environment-creation primitive, package installer and
//! version introspection.
//!
//! These are external programs; [`Runtime`] is the seam that lets the
//! builder and the upgrade workflow drive them, and lets tests substitute
//! [`MockRuntime`].

pub mod mock;
pub mod python;
pub mod version;

pub use mock::{MockRuntime, RuntimeCall};
pub use python::PythonRuntime;
pub use version::RuntimeVersion;

use std::path::Path;

use crate::error::Result;

/// Options passed to the environment-creation primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenvOptions {
    /// Give the environment access to the system site-packages.
    pub system_site_packages: bool,

    /// Bootstrap the installer (`false` maps to `--without-pip`).
    pub with_pip: bool,

    /// Prompt prefix recorded in the environment.
    pub prompt: String,

    /// Re-point an existing environment at the current interpreter.
    pub upgrade: bool,
}

/// The host interpreter and its tooling.
pub trait Runtime {
    /// Run the environment-creation primitive against `root`.
    ///
    /// `root` may already exist (it is reserved before the build starts).
    fn create_env(&self, root: &Path, options: &VenvOptions) -> Result<()>;

    /// Install or upgrade `packages` inside the environment at `root`.
    fn install(&self, root: &Path, packages: &[String]) -> Result<()>;

    /// Version of the interpreter environments are built with.
    fn version(&self) -> Result<RuntimeVersion>;

    /// Human-readable description of the interpreter (for `--context`).
    fn describe(&self) -> String;
}

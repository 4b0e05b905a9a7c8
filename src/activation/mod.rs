//! Shell activation.
//!
//! veman cannot change its caller's shell directly. Activation is a script
//! printed on stdout for the shell to `eval`; the script sources the
//! environment's artifact (`bin/veman_activate`), which carries the session
//! state and the deactivation hook.

pub mod script;
pub mod session;

pub use script::{render_artifact, shell_integration, ActivationScript};
pub use session::ActivationSession;

use std::fs;
use std::path::PathBuf;

use crate::error::{IoResultExt, Result, VemanError};
use crate::store::Environment;

/// Write (or rewrite) the activation script artifact for `env`.
pub fn write_artifact(env: &Environment) -> Result<PathBuf> {
    let path = env.artifact_file();
    let bin = env.bin_dir();
    fs::create_dir_all(&bin).at(&bin)?;
    fs::write(&path, render_artifact(env)).at(&path)?;
    tracing::debug!("wrote activation script {}", path.display());
    Ok(path)
}

/// Produce the script that activates `env` in the calling shell.
///
/// Fails when the artifact is missing (`veman upgrade --scripts` restores it).
pub fn activate(env: &Environment) -> Result<ActivationScript> {
    let artifact = env.artifact_file();
    if !artifact.is_file() {
        return Err(VemanError::Other(anyhow::anyhow!(
            "activation script {} is missing; run `veman upgrade --scripts {}`",
            artifact.display(),
            env.name
        )));
    }
    Ok(ActivationScript::for_environment(env))
}

//! Environment materialization.
//!
//! [`EnvironmentBuilder`] drives the [`Runtime`] to turn a reserved
//! directory into a managed environment, and implements the in-place
//! mutations used by `upgrade` (core tooling, interpreter relink).
//!
//! Failures are returned as-is: a partially built directory stays on disk
//! so the installer's leftovers can be inspected, and the caller decides
//! whether to remove it.

use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::activation;
use crate::error::{IoResultExt, Result, VemanError};
use crate::runtime::{Runtime, RuntimeVersion, VenvOptions};
use crate::store::layout;
use crate::store::{CreateOptions, Environment, EnvironmentName};

/// Builds and mutates environments through a [`Runtime`].
pub struct EnvironmentBuilder<'a> {
    runtime: &'a dyn Runtime,
    core_packages: Vec<String>,
}

impl<'a> EnvironmentBuilder<'a> {
    /// A builder installing `core_packages` when the installer is enabled.
    pub fn new(runtime: &'a dyn Runtime, core_packages: Vec<String>) -> Self {
        Self {
            runtime,
            core_packages,
        }
    }

    /// The runtime in use.
    pub fn runtime(&self) -> &dyn Runtime {
        self.runtime
    }

    /// Packages kept current by [`install_core_tooling`](Self::install_core_tooling).
    pub fn core_packages(&self) -> &[String] {
        &self.core_packages
    }

    /// Materialize an environment at `root`.
    ///
    /// `root` must already exist (the store reserves it with an exclusive
    /// create). Runs the creation primitive, then the installer when
    /// `options.with_pip` is set, then records metadata and writes the
    /// activation script artifact and an empty history file.
    pub fn build(
        &self,
        root: &Path,
        name: &EnvironmentName,
        options: &CreateOptions,
        temporary: bool,
    ) -> Result<Environment> {
        let venv = VenvOptions {
            system_site_packages: options.system_site_packages,
            with_pip: options.with_pip,
            prompt: options.prompt_for(name.as_str()),
            upgrade: false,
        };

        tracing::debug!("building environment {} at {}", name, root.display());
        self.runtime.create_env(root, &venv)?;

        if options.with_pip {
            self.install_core_tooling(root)?;
        }

        let interpreter_version = match self.runtime.version() {
            Ok(version) => Some(version),
            Err(e) => {
                tracing::warn!("could not determine interpreter version: {}", e);
                None
            }
        };

        let env = Environment {
            name: name.to_string(),
            root: root.to_path_buf(),
            created_with: options.clone(),
            temporary,
            interpreter_version,
            created_at: Some(Utc::now()),
        };

        env.save_metadata()?;
        activation::write_artifact(&env)?;
        touch(&env.history_file())?;

        tracing::info!("built environment {}", name);
        Ok(env)
    }

    /// Install or upgrade the core tooling inside the environment at `root`.
    pub fn install_core_tooling(&self, root: &Path) -> Result<()> {
        self.runtime.install(root, &self.core_packages)
    }

    /// Re-point `env` at the current interpreter.
    ///
    /// Stale `python`/`python3` links are removed first so the creation
    /// primitive recreates them; if it fails, the old links are put back so
    /// the environment stays managed. Fails with `IncompatibleRuntimeVersion`
    /// when the current interpreter cannot host the environment.
    pub fn relink_interpreter(&self, env: &mut Environment) -> Result<RuntimeVersion> {
        let current = self.runtime.version()?;

        if let Some(recorded) = env.interpreter_version {
            if !recorded.can_upgrade_to(&current) {
                return Err(VemanError::IncompatibleRuntimeVersion {
                    name: env.name.clone(),
                    recorded: recorded.to_string(),
                    current: current.to_string(),
                });
            }
        }

        let removed = remove_interpreter_links(&env.bin_dir())?;

        let venv = VenvOptions {
            system_site_packages: env.created_with.system_site_packages,
            with_pip: env.created_with.with_pip,
            prompt: env.prompt(),
            upgrade: true,
        };
        if let Err(err) = self.runtime.create_env(&env.root, &venv) {
            restore_interpreter_links(&removed);
            return Err(err);
        }

        env.interpreter_version = Some(current);
        env.save_metadata()?;
        Ok(current)
    }

    /// Regenerate the activation script artifact for `env`.
    pub fn regenerate_scripts(&self, env: &Environment) -> Result<()> {
        activation::write_artifact(env)?;
        touch(&env.history_file())
    }
}

/// Remove the symlinked interpreters in `bin`, returning each link and its target.
fn remove_interpreter_links(bin: &Path) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut removed = Vec::new();
    for interpreter in layout::INTERPRETER_NAMES {
        let link = bin.join(interpreter);
        let is_link = fs::symlink_metadata(&link)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false);
        if !is_link {
            continue;
        }
        let target = fs::read_link(&link).at(&link)?;
        tracing::debug!("removing interpreter link {}", link.display());
        fs::remove_file(&link).at(&link)?;
        removed.push((link, target));
    }
    Ok(removed)
}

/// Put back links removed by [`remove_interpreter_links`] that nothing replaced.
fn restore_interpreter_links(removed: &[(PathBuf, PathBuf)]) {
    for (link, target) in removed {
        if fs::symlink_metadata(link).is_ok() {
            continue;
        }
        tracing::debug!("restoring interpreter link {}", link.display());
        if let Err(e) = symlink(target, link) {
            tracing::warn!("could not restore {}: {}", link.display(), e);
        }
    }
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

fn touch(path: &Path) -> Result<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .at(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RuntimeCall};
    use tempfile::TempDir;

    fn core() -> Vec<String> {
        vec!["pip".to_string(), "setuptools".to_string()]
    }

    fn reserved(temp: &TempDir, name: &str) -> std::path::PathBuf {
        let root = temp.path().join(name);
        fs::create_dir(&root).unwrap();
        root
    }

    #[test]
    fn build_produces_managed_environment() {
        let temp = TempDir::new().unwrap();
        let root = reserved(&temp, "web");
        let runtime = MockRuntime::new();
        let builder = EnvironmentBuilder::new(&runtime, core());
        let name = EnvironmentName::parse("web").unwrap();

        let env = builder
            .build(&root, &name, &CreateOptions::default(), false)
            .unwrap();

        assert!(layout::is_managed(&root));
        assert!(env.history_file().exists());
        assert_eq!(env.interpreter_version, Some(RuntimeVersion::new(3, 12, 0)));
        assert_eq!(runtime.install_count(), 1);
        assert_eq!(
            runtime.calls()[1],
            RuntimeCall::Install {
                root: root.clone(),
                packages: core()
            }
        );
    }

    #[test]
    fn without_pip_skips_installer() {
        let temp = TempDir::new().unwrap();
        let root = reserved(&temp, "bare");
        let runtime = MockRuntime::new();
        let builder = EnvironmentBuilder::new(&runtime, core());
        let options = CreateOptions {
            with_pip: false,
            ..Default::default()
        };

        builder
            .build(&root, &EnvironmentName::parse("bare").unwrap(), &options, false)
            .unwrap();

        assert_eq!(runtime.install_count(), 0);
    }

    #[test]
    fn prompt_defaults_to_name() {
        let temp = TempDir::new().unwrap();
        let root = reserved(&temp, "web");
        let runtime = MockRuntime::new();
        let builder = EnvironmentBuilder::new(&runtime, core());

        builder
            .build(
                &root,
                &EnvironmentName::parse("web").unwrap(),
                &CreateOptions::default(),
                false,
            )
            .unwrap();

        match &runtime.calls()[0] {
            RuntimeCall::CreateEnv { options, .. } => {
                assert_eq!(options.prompt, "web");
                assert!(!options.upgrade);
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn installer_failure_leaves_directory_for_inspection() {
        let temp = TempDir::new().unwrap();
        let root = reserved(&temp, "broken");
        let runtime = MockRuntime::new().failing_install("Could not find a version");
        let builder = EnvironmentBuilder::new(&runtime, core());

        let err = builder
            .build(
                &root,
                &EnvironmentName::parse("broken").unwrap(),
                &CreateOptions::default(),
                false,
            )
            .unwrap_err();

        assert_eq!(err.diagnostic_output(), Some("Could not find a version"));
        assert!(root.join("pyvenv.cfg").exists());
        assert!(!layout::is_managed(&root));
    }

    #[test]
    #[cfg(unix)]
    fn relink_replaces_stale_links() {
        let temp = TempDir::new().unwrap();
        let root = reserved(&temp, "web");
        let runtime = MockRuntime::new();
        let builder = EnvironmentBuilder::new(&runtime, core());
        let mut env = builder
            .build(
                &root,
                &EnvironmentName::parse("web").unwrap(),
                &CreateOptions::default(),
                false,
            )
            .unwrap();
        let python3 = env.bin_dir().join("python3");
        fs::remove_file(&python3).unwrap();
        std::os::unix::fs::symlink("/nonexistent/python3.11", &python3).unwrap();

        builder.relink_interpreter(&mut env).unwrap();

        assert_eq!(fs::read_link(&python3).unwrap(), Path::new("python"));
        let upgrade_call = runtime.calls().into_iter().rev().find_map(|c| match c {
            RuntimeCall::CreateEnv { options, .. } => Some(options),
            _ => None,
        });
        assert!(upgrade_call.unwrap().upgrade);
    }

    #[test]
    #[cfg(unix)]
    fn failed_relink_restores_links() {
        let temp = TempDir::new().unwrap();
        let root = reserved(&temp, "web");
        let runtime = MockRuntime::new();
        let mut env = EnvironmentBuilder::new(&runtime, core())
            .build(
                &root,
                &EnvironmentName::parse("web").unwrap(),
                &CreateOptions::default(),
                false,
            )
            .unwrap();
        let python = env.bin_dir().join("python");
        fs::remove_file(&python).unwrap();
        std::os::unix::fs::symlink("/usr/bin/python3.12", &python).unwrap();

        let broken = MockRuntime::new().failing_create("venv: permission denied");
        let err = EnvironmentBuilder::new(&broken, core())
            .relink_interpreter(&mut env)
            .unwrap_err();

        assert_eq!(err.diagnostic_output(), Some("venv: permission denied"));
        assert_eq!(fs::read_link(&python).unwrap(), Path::new("/usr/bin/python3.12"));
        assert_eq!(
            fs::read_link(env.bin_dir().join("python3")).unwrap(),
            Path::new("python")
        );
        assert!(layout::is_managed(&root));

        EnvironmentBuilder::new(&runtime, core())
            .relink_interpreter(&mut env)
            .unwrap();
    }

    #[test]
    fn relink_refuses_older_minor() {
        let temp = TempDir::new().unwrap();
        let root = reserved(&temp, "new");
        let builder_runtime = MockRuntime::with_version(RuntimeVersion::new(3, 12, 1));
        let mut env = EnvironmentBuilder::new(&builder_runtime, core())
            .build(
                &root,
                &EnvironmentName::parse("new").unwrap(),
                &CreateOptions::default(),
                false,
            )
            .unwrap();

        let older = MockRuntime::with_version(RuntimeVersion::new(3, 11, 9));
        let err = EnvironmentBuilder::new(&older, core())
            .relink_interpreter(&mut env)
            .unwrap_err();

        assert!(matches!(err, VemanError::IncompatibleRuntimeVersion { .. }));
        assert_eq!(env.interpreter_version, Some(RuntimeVersion::new(3, 12, 1)));
    }

    #[test]
    fn relink_records_new_version() {
        let temp = TempDir::new().unwrap();
        let root = reserved(&temp, "web");
        let old = MockRuntime::with_version(RuntimeVersion::new(3, 11, 2));
        let mut env = EnvironmentBuilder::new(&old, core())
            .build(
                &root,
                &EnvironmentName::parse("web").unwrap(),
                &CreateOptions::default(),
                false,
            )
            .unwrap();

        let newer = MockRuntime::with_version(RuntimeVersion::new(3, 12, 0));
        EnvironmentBuilder::new(&newer, core())
            .relink_interpreter(&mut env)
            .unwrap();

        let reloaded = Environment::load(&root).unwrap();
        assert_eq!(
            reloaded.interpreter_version,
            Some(RuntimeVersion::new(3, 12, 0))
        );
    }
}

//! The environment registry.
//!
//! Directory presence under the registry root is the registry: there is no
//! index file, and every call enumerates the filesystem afresh.

pub mod environment;
pub mod layout;
pub mod name;

pub use environment::{CreateOptions, Environment};
pub use name::EnvironmentName;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::activation::ActivationSession;
use crate::builder::EnvironmentBuilder;
use crate::error::{IoResultExt, Result, VemanError};

/// Environments under one registry root.
#[derive(Debug, Clone)]
pub struct EnvironmentStore {
    root: PathBuf,
}

impl EnvironmentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The registry root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the registry root if it does not exist.
    pub fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).at(&self.root)
    }

    /// Directory for the environment called `name`.
    pub fn path_for(&self, name: &EnvironmentName) -> PathBuf {
        self.root.join(name.as_str())
    }

    /// Whether anything occupies the directory for `name`.
    pub fn exists(&self, name: &EnvironmentName) -> bool {
        fs::symlink_metadata(self.path_for(name)).is_ok()
    }

    /// Create and build the environment `name`.
    ///
    /// Fails with `AlreadyExists` when the directory exists and `overwrite`
    /// is false; with `overwrite`, the old directory is removed first. A
    /// build failure leaves the partial directory in place.
    pub fn create(
        &self,
        name: &EnvironmentName,
        options: &CreateOptions,
        overwrite: bool,
        builder: &EnvironmentBuilder<'_>,
    ) -> Result<Environment> {
        self.create_with(name, options, overwrite, false, builder)
    }

    pub(crate) fn create_with(
        &self,
        name: &EnvironmentName,
        options: &CreateOptions,
        overwrite: bool,
        temporary: bool,
        builder: &EnvironmentBuilder<'_>,
    ) -> Result<Environment> {
        self.ensure_root()?;
        let path = self.path_for(name);

        if overwrite && self.exists(name) {
            tracing::info!("removing existing environment {}", name);
            remove_entry(&path)?;
        }

        let root = self.reserve(name)?;
        builder.build(&root, name, options, temporary)
    }

    /// Claim the directory for `name` with an exclusive create.
    ///
    /// Of two concurrent reservations for the same name exactly one wins;
    /// the other gets `AlreadyExists`.
    pub fn reserve(&self, name: &EnvironmentName) -> Result<PathBuf> {
        let path = self.path_for(name);
        match fs::create_dir(&path) {
            Ok(()) => Ok(path),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(VemanError::AlreadyExists {
                name: name.to_string(),
            }),
            Err(e) => Err(VemanError::from_io(e, &path)),
        }
    }

    /// All non-temporary managed environments, ordered by name.
    ///
    /// Directories without the managed layout are ignored. A missing
    /// registry root is an empty registry. Environments whose metadata
    /// cannot be loaded are left out; [`scan`](Self::scan) reports them.
    pub fn list(&self) -> Result<Vec<Environment>> {
        let scan = self.scan()?;
        for (name, e) in &scan.failures {
            tracing::warn!("skipping {}: {}", name, e);
        }
        Ok(scan.listed())
    }

    /// Every managed environment, temporary ones included, in directory
    /// order, along with the managed directories that failed to load.
    pub fn scan(&self) -> Result<Scan> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Scan::default()),
            Err(e) => return Err(VemanError::from_io(e, &self.root)),
        };

        let mut scan = Scan::default();
        for entry in entries {
            let path = entry.at(&self.root)?.path();
            if !layout::is_managed(&path) {
                tracing::debug!("skipping {}: not a managed environment", path.display());
                continue;
            }
            match Environment::load(&path) {
                Ok(env) => scan.environments.push(env),
                Err(e) => {
                    let name = entry_name(&path);
                    scan.failures.push((name, e));
                }
            }
        }
        Ok(scan)
    }

    /// The non-temporary environment called `name`.
    pub fn get(&self, name: &str) -> Result<Environment> {
        let env = self.get_any(name)?;
        if env.temporary {
            return Err(VemanError::NotFound {
                name: name.to_string(),
            });
        }
        Ok(env)
    }

    /// The environment called `name`, temporary or not.
    pub fn get_any(&self, name: &str) -> Result<Environment> {
        let parsed = EnvironmentName::parse(name)?;
        let path = self.path_for(&parsed);
        if !layout::is_managed(&path) {
            return Err(VemanError::NotFound {
                name: name.to_string(),
            });
        }
        Environment::load(&path)
    }

    /// Like [`get`](Self::get), but also accepts an environment whose
    /// activation script artifact is missing, so it can be regenerated.
    ///
    /// The directory still needs the runtime layout and veman's metadata.
    pub fn get_repairable(&self, name: &str) -> Result<Environment> {
        let parsed = EnvironmentName::parse(name)?;
        let path = self.path_for(&parsed);
        let repairable = layout::is_runtime_env(&path) && layout::metadata_path(&path).is_file();
        if !layout::is_managed(&path) && !repairable {
            return Err(VemanError::NotFound {
                name: name.to_string(),
            });
        }
        let env = Environment::load(&path)?;
        if env.temporary {
            return Err(VemanError::NotFound {
                name: name.to_string(),
            });
        }
        Ok(env)
    }

    /// Resolve an environment by name, or let `select` pick from [`list`](Self::list).
    ///
    /// `select` receives the listed environments and returns the chosen
    /// index, or `None` when the user declined.
    pub fn resolve<F>(&self, name: Option<&str>, select: F) -> Result<Environment>
    where
        F: FnOnce(&[Environment]) -> Result<Option<usize>>,
    {
        if let Some(name) = name {
            return self.get(name);
        }

        let envs = self.list()?;
        if envs.is_empty() {
            return Err(VemanError::Other(anyhow::anyhow!(
                "no environments in {}; create one with `veman create <name>`",
                self.root.display()
            )));
        }

        match select(&envs)? {
            Some(index) => envs.into_iter().nth(index).ok_or_else(|| {
                VemanError::Other(anyhow::anyhow!("selection {} is out of range", index))
            }),
            None => Err(VemanError::Other(anyhow::anyhow!("no environment selected"))),
        }
    }

    /// Delete the environment called `name`.
    ///
    /// Refuses with `EnvironmentActive` when `session` has it active. A
    /// temporary environment belongs to the session that created it and is
    /// `NotFound` to every other caller. A directory left by a failed build
    /// can be deleted too; any other directory is `NotFound` and untouched.
    pub fn delete(&self, name: &str, session: &ActivationSession) -> Result<()> {
        let parsed = EnvironmentName::parse(name)?;
        let path = self.path_for(&parsed);
        let not_found = || VemanError::NotFound {
            name: name.to_string(),
        };

        let managed = layout::is_managed(&path);
        if !managed && !layout::is_build_leftover(&path) {
            return Err(not_found());
        }

        if session.is_active_root(&path) {
            return Err(VemanError::EnvironmentActive {
                name: name.to_string(),
            });
        }

        if managed {
            let env = Environment::load(&path)?;
            if env.temporary {
                return Err(not_found());
            }
        } else {
            tracing::debug!("deleting incomplete environment {}", path.display());
        }

        remove_entry(&path)?;
        tracing::info!("deleted environment {}", name);
        Ok(())
    }
}

/// One enumeration of the registry root.
#[derive(Debug, Default)]
pub struct Scan {
    /// Loaded environments, temporary ones included, in directory order.
    pub environments: Vec<Environment>,

    /// Managed directories whose metadata could not be loaded, by name.
    pub failures: Vec<(String, VemanError)>,
}

impl Scan {
    /// Non-temporary environments, ordered by name.
    pub fn listed(self) -> Vec<Environment> {
        let mut envs: Vec<Environment> = self
            .environments
            .into_iter()
            .filter(|env| !env.temporary)
            .collect();
        envs.sort_by(|a, b| a.name.cmp(&b.name));
        envs
    }
}

fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn remove_entry(path: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(path).at(path)?;
    if meta.is_dir() {
        fs::remove_dir_all(path).at(path)
    } else {
        fs::remove_file(path).at(path)
    }
}

//! The persistent environment entity and its recorded metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IoResultExt, Result, VemanError};
use crate::runtime::RuntimeVersion;

use super::layout;

/// Options an environment is created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOptions {
    /// Give the environment access to the system site-packages.
    #[serde(default)]
    pub system_site_packages: bool,

    /// Bootstrap the package installer into the environment.
    #[serde(default = "default_true")]
    pub with_pip: bool,

    /// Prompt prefix; `None` means the environment name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            system_site_packages: false,
            with_pip: true,
            prompt: None,
        }
    }
}

impl CreateOptions {
    /// The prompt prefix to use for an environment called `name`.
    pub fn prompt_for(&self, name: &str) -> String {
        self.prompt
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(name)
            .to_string()
    }
}

fn default_true() -> bool {
    true
}

/// Contents of `.veman.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Metadata {
    name: String,
    #[serde(default)]
    temporary: bool,
    created_with: CreateOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    interpreter_version: Option<RuntimeVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

/// A named, persistent environment under a registry root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Unique name within the registry root.
    pub name: String,

    /// Environment directory.
    pub root: PathBuf,

    /// Options recorded at creation.
    pub created_with: CreateOptions,

    /// Created by `temp`; deleted on deactivation.
    pub temporary: bool,

    /// Interpreter version the environment was built against.
    pub interpreter_version: Option<RuntimeVersion>,

    /// When the environment was built.
    pub created_at: Option<DateTime<Utc>>,
}

impl Environment {
    /// Load the environment rooted at `root`.
    ///
    /// Reads `.veman.yml`; environments made by older releases have no
    /// metadata file, so their options are derived from `pyvenv.cfg`.
    pub fn load(root: &Path) -> Result<Self> {
        let dir_name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let meta_path = layout::metadata_path(root);
        if meta_path.is_file() {
            let content = fs::read_to_string(&meta_path).at(&meta_path)?;
            let meta: Metadata =
                serde_yaml::from_str(&content).map_err(|e| VemanError::ConfigParseError {
                    path: meta_path.clone(),
                    message: e.to_string(),
                })?;
            return Ok(Self {
                name: dir_name,
                root: root.to_path_buf(),
                created_with: meta.created_with,
                temporary: meta.temporary,
                interpreter_version: meta.interpreter_version,
                created_at: meta.created_at,
            });
        }

        let cfg = layout::read_pyvenv_cfg(root)?;
        let interpreter_version = cfg
            .get("version_info")
            .or_else(|| cfg.get("version"))
            .and_then(|v| RuntimeVersion::extract(v));
        let system_site_packages = cfg
            .get("include-system-site-packages")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));
        let prompt = cfg
            .get("prompt")
            .map(|p| p.trim_matches(|c| c == '\'' || c == '"').to_string())
            .filter(|p| !p.is_empty() && *p != dir_name);
        let with_pip = layout::bin_dir(root).join("pip").exists();

        Ok(Self {
            name: dir_name,
            root: root.to_path_buf(),
            created_with: CreateOptions {
                system_site_packages,
                with_pip,
                prompt,
            },
            temporary: false,
            interpreter_version,
            created_at: None,
        })
    }

    /// Write `.veman.yml`.
    pub fn save_metadata(&self) -> Result<()> {
        let meta = Metadata {
            name: self.name.clone(),
            temporary: self.temporary,
            created_with: self.created_with.clone(),
            interpreter_version: self.interpreter_version,
            created_at: self.created_at,
        };
        let content = serde_yaml::to_string(&meta).map_err(|e| anyhow::anyhow!(e))?;

        let path = layout::metadata_path(&self.root);
        let temp_path = path.with_extension("yml.tmp");
        fs::write(&temp_path, content).at(&temp_path)?;
        fs::rename(&temp_path, &path).at(&path)?;
        Ok(())
    }

    /// Prompt prefix shown while active.
    pub fn prompt(&self) -> String {
        self.created_with.prompt_for(&self.name)
    }

    /// Executable directory.
    pub fn bin_dir(&self) -> PathBuf {
        layout::bin_dir(&self.root)
    }

    /// Per-environment history file.
    pub fn history_file(&self) -> PathBuf {
        layout::history_path(&self.root)
    }

    /// Activation script artifact.
    pub fn artifact_file(&self) -> PathBuf {
        layout::artifact_path(&self.root)
    }

    /// Runtime's native activation script.
    pub fn native_activate_file(&self) -> PathBuf {
        layout::native_activate_path(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn runtime_layout(root: &Path, cfg: &str) {
        fs::create_dir_all(layout::bin_dir(root)).unwrap();
        fs::write(layout::pyvenv_cfg_path(root), cfg).unwrap();
    }

    #[test]
    fn prompt_defaults_to_name() {
        let options = CreateOptions::default();
        assert_eq!(options.prompt_for("web"), "web");

        let options = CreateOptions {
            prompt: Some("api".into()),
            ..Default::default()
        };
        assert_eq!(options.prompt_for("web"), "api");
    }

    #[test]
    fn empty_prompt_falls_back_to_name() {
        let options = CreateOptions {
            prompt: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(options.prompt_for("web"), "web");
    }

    #[test]
    fn metadata_round_trips_through_disk() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("web");
        runtime_layout(&root, "home = /usr/bin\n");

        let env = Environment {
            name: "web".into(),
            root: root.clone(),
            created_with: CreateOptions {
                system_site_packages: true,
                with_pip: false,
                prompt: Some("w".into()),
            },
            temporary: true,
            interpreter_version: Some(RuntimeVersion::new(3, 12, 2)),
            created_at: Some(Utc::now()),
        };
        env.save_metadata().unwrap();

        let loaded = Environment::load(&root).unwrap();
        assert_eq!(loaded.created_with, env.created_with);
        assert!(loaded.temporary);
        assert_eq!(loaded.interpreter_version, env.interpreter_version);
        assert!(!layout::metadata_path(&root)
            .with_extension("yml.tmp")
            .exists());
    }

    #[test]
    fn falls_back_to_pyvenv_cfg() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("legacy");
        runtime_layout(
            &root,
            "home = /usr/bin\ninclude-system-site-packages = true\nversion = 3.10.12\nprompt = 'old'\n",
        );

        let env = Environment::load(&root).unwrap();
        assert_eq!(env.name, "legacy");
        assert!(!env.temporary);
        assert!(env.created_with.system_site_packages);
        assert_eq!(env.created_with.prompt.as_deref(), Some("old"));
        assert_eq!(env.interpreter_version, Some(RuntimeVersion::new(3, 10, 12)));
        assert_eq!(env.prompt(), "old");
    }

    #[test]
    fn pyvenv_prompt_equal_to_name_is_not_recorded() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("same");
        runtime_layout(&root, "prompt = same\n");

        let env = Environment::load(&root).unwrap();
        assert!(env.created_with.prompt.is_none());
    }

    #[test]
    fn corrupt_metadata_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("bad");
        runtime_layout(&root, "");
        fs::write(layout::metadata_path(&root), "created_with: [").unwrap();

        let err = Environment::load(&root).unwrap_err();
        assert!(matches!(err, VemanError::ConfigParseError { .. }));
    }
}

//! Mock runtime for testing.
//!
//! `MockRuntime` implements [`Runtime`] without an interpreter: it writes the
//! same layout the creation primitive would (including a working native
//! `bin/activate`), records every call, and can be told to fail.
//!
//! # Example
//!
//! ```
//! use veman::runtime::{MockRuntime, Runtime, RuntimeCall, VenvOptions};
//!
//! let temp = std::env::temp_dir().join(format!("veman-doc-{}", std::process::id()));
//! let runtime = MockRuntime::new();
//! let options = VenvOptions {
//!     system_site_packages: false,
//!     with_pip: true,
//!     prompt: "demo".into(),
//!     upgrade: false,
//! };
//! runtime.create_env(&temp, &options).unwrap();
//! assert!(temp.join("pyvenv.cfg").exists());
//! assert!(matches!(runtime.calls()[0], RuntimeCall::CreateEnv { .. }));
//! std::fs::remove_dir_all(&temp).unwrap();
//! ```

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IoResultExt, Result, VemanError};
use crate::store::layout;

use super::{Runtime, RuntimeVersion, VenvOptions};

/// A recorded runtime call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCall {
    CreateEnv { root: PathBuf, options: VenvOptions },
    Install { root: PathBuf, packages: Vec<String> },
    Version,
}

/// Mock runtime implementation for testing.
#[derive(Debug)]
pub struct MockRuntime {
    version: RuntimeVersion,
    calls: RefCell<Vec<RuntimeCall>>,
    fail_create: Option<String>,
    fail_install: Option<String>,
    fail_version: bool,
}

impl Default for MockRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRuntime {
    /// A runtime reporting Python 3.12.0 that always succeeds.
    pub fn new() -> Self {
        Self::with_version(RuntimeVersion::new(3, 12, 0))
    }

    /// A runtime reporting `version`.
    pub fn with_version(version: RuntimeVersion) -> Self {
        Self {
            version,
            calls: RefCell::new(Vec::new()),
            fail_create: None,
            fail_install: None,
            fail_version: false,
        }
    }

    /// Make `create_env` fail with `output` as diagnostics.
    pub fn failing_create(mut self, output: &str) -> Self {
        self.fail_create = Some(output.to_string());
        self
    }

    /// Make `install` fail with `output` as diagnostics.
    pub fn failing_install(mut self, output: &str) -> Self {
        self.fail_install = Some(output.to_string());
        self
    }

    /// Make `version` fail.
    pub fn failing_version(mut self) -> Self {
        self.fail_version = true;
        self
    }

    /// All calls made so far.
    pub fn calls(&self) -> Vec<RuntimeCall> {
        self.calls.borrow().clone()
    }

    /// Number of `install` calls made so far.
    pub fn install_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, RuntimeCall::Install { .. }))
            .count()
    }

    fn failure(command: &str, output: &str) -> VemanError {
        VemanError::SubprocessFailure {
            command: command.to_string(),
            code: Some(1),
            output: output.to_string(),
        }
    }

    fn write_layout(&self, root: &Path, options: &VenvOptions) -> Result<()> {
        let bin = layout::bin_dir(root);
        fs::create_dir_all(&bin).at(&bin)?;

        let cfg = format!(
            "home = /usr/bin\ninclude-system-site-packages = {}\nversion = {}\nprompt = '{}'\n",
            options.system_site_packages, self.version, options.prompt
        );
        let cfg_path = layout::pyvenv_cfg_path(root);
        fs::write(&cfg_path, cfg).at(&cfg_path)?;

        let python = bin.join("python");
        if fs::symlink_metadata(&python).is_err() {
            fs::write(&python, format!("mock interpreter {}\n", self.version)).at(&python)?;
        }
        let python3 = bin.join("python3");
        if fs::symlink_metadata(&python3).is_err() {
            #[cfg(unix)]
            std::os::unix::fs::symlink("python", &python3).at(&python3)?;
            #[cfg(not(unix))]
            fs::write(&python3, "").at(&python3)?;
        }

        let activate = layout::native_activate_path(root);
        fs::write(&activate, native_activate_script(root)).at(&activate)?;

        if options.with_pip {
            let pip = bin.join("pip");
            fs::write(&pip, "mock installer\n").at(&pip)?;
        }
        Ok(())
    }
}

impl Runtime for MockRuntime {
    fn create_env(&self, root: &Path, options: &VenvOptions) -> Result<()> {
        self.calls.borrow_mut().push(RuntimeCall::CreateEnv {
            root: root.to_path_buf(),
            options: options.clone(),
        });

        if let Some(output) = &self.fail_create {
            return Err(Self::failure("mock -m venv", output));
        }

        self.write_layout(root, options)
    }

    fn install(&self, root: &Path, packages: &[String]) -> Result<()> {
        self.calls.borrow_mut().push(RuntimeCall::Install {
            root: root.to_path_buf(),
            packages: packages.to_vec(),
        });

        match &self.fail_install {
            Some(output) => Err(Self::failure("mock -m pip install", output)),
            None => Ok(()),
        }
    }

    fn version(&self) -> Result<RuntimeVersion> {
        self.calls.borrow_mut().push(RuntimeCall::Version);
        if self.fail_version {
            return Err(Self::failure("mock --version", "interpreter missing"));
        }
        Ok(self.version)
    }

    fn describe(&self) -> String {
        format!("mock interpreter {}", self.version)
    }
}

/// A native activation script with the creation primitive's contract:
/// exports `VIRTUAL_ENV`, prepends `bin` to `PATH`, defines `deactivate`.
fn native_activate_script(root: &Path) -> String {
    format!(
        r#"# This file must be used with "source bin/activate" *from bash*
deactivate () {{
    if [ -n "${{_OLD_VIRTUAL_PATH:-}}" ] ; then
        PATH="${{_OLD_VIRTUAL_PATH:-}}"
        export PATH
        unset _OLD_VIRTUAL_PATH
    fi
    hash -r 2> /dev/null
    unset VIRTUAL_ENV
    unset VIRTUAL_ENV_PROMPT
    if [ ! "${{1:-}}" = "nondestructive" ] ; then
        unset -f deactivate
    fi
}}

deactivate nondestructive

VIRTUAL_ENV={root}
export VIRTUAL_ENV

_OLD_VIRTUAL_PATH="$PATH"
PATH="$VIRTUAL_ENV/bin:$PATH"
export PATH
hash -r 2> /dev/null
"#,
        root = crate::shell::quote_path(root)
    )
}

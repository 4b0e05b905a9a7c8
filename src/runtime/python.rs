//! The real runtime: `python -m venv` and `pip`.

use std::path::{Path, PathBuf};

use crate::error::{Result, VemanError};
use crate::shell::{run_checked, CommandOptions, Invocation};
use crate::store::layout;

use super::{Runtime, RuntimeVersion, VenvOptions};

/// Drives a Python interpreter found on `PATH` or at an explicit path.
#[derive(Debug, Clone)]
pub struct PythonRuntime {
    interpreter: PathBuf,
}

impl PythonRuntime {
    /// Use `interpreter` (a command name or a path).
    pub fn new(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    /// The interpreter used for environment creation.
    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    /// The `venv` invocation for `root` with `options`.
    pub fn venv_invocation(&self, root: &Path, options: &VenvOptions) -> Invocation {
        Invocation::new(&self.interpreter)
            .args(["-m", "venv"])
            .arg_if(options.system_site_packages, "--system-site-packages")
            .arg_if(!options.with_pip, "--without-pip")
            .arg_if(options.upgrade, "--upgrade")
            .arg("--prompt")
            .arg(&options.prompt)
            .arg(root)
    }

    /// The installer invocation upgrading `packages` inside `root`.
    pub fn install_invocation(root: &Path, packages: &[String]) -> Invocation {
        Invocation::new(layout::bin_dir(root).join("python"))
            .args(["-m", "pip", "install", "--upgrade", "--disable-pip-version-check"])
            .args(packages)
    }

    /// Environment for child processes: never leak an active environment.
    fn child_options() -> CommandOptions {
        CommandOptions {
            env_remove: vec!["VIRTUAL_ENV".to_string(), "PYTHONHOME".to_string()],
            ..Default::default()
        }
    }
}

impl Runtime for PythonRuntime {
    fn create_env(&self, root: &Path, options: &VenvOptions) -> Result<()> {
        let invocation = self.venv_invocation(root, options);
        run_checked(&invocation, &Self::child_options())?;
        Ok(())
    }

    fn install(&self, root: &Path, packages: &[String]) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }
        let invocation = Self::install_invocation(root, packages);
        run_checked(&invocation, &Self::child_options())?;
        Ok(())
    }

    fn version(&self) -> Result<RuntimeVersion> {
        let invocation = Invocation::new(&self.interpreter).arg("--version");
        let result = run_checked(&invocation, &Self::child_options())?;

        // Python 2 printed its banner on stderr.
        let banner = format!("{}{}", result.stdout, result.stderr);
        RuntimeVersion::extract(&banner).ok_or_else(|| VemanError::SubprocessFailure {
            command: invocation.display(),
            code: result.exit_code,
            output: format!("unrecognized version output: {}", banner.trim()),
        })
    }

    fn describe(&self) -> String {
        self.interpreter.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> VenvOptions {
        VenvOptions {
            system_site_packages: false,
            with_pip: true,
            prompt: "web".into(),
            upgrade: false,
        }
    }

    #[test]
    fn venv_invocation_defaults() {
        let runtime = PythonRuntime::new("python3");
        let inv = runtime.venv_invocation(Path::new("/envs/web"), &options());

        assert_eq!(inv.program(), Path::new("python3"));
        assert_eq!(
            inv.arg_strings(),
            vec!["-m", "venv", "--prompt", "web", "/envs/web"]
        );
    }

    #[test]
    fn venv_invocation_maps_flags() {
        let runtime = PythonRuntime::new("/usr/bin/python3.12");
        let opts = VenvOptions {
            system_site_packages: true,
            with_pip: false,
            prompt: "sci".into(),
            upgrade: true,
        };
        let args = runtime
            .venv_invocation(Path::new("/envs/sci"), &opts)
            .arg_strings();

        assert!(args.contains(&"--system-site-packages".to_string()));
        assert!(args.contains(&"--without-pip".to_string()));
        assert!(args.contains(&"--upgrade".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("/envs/sci"));
    }

    #[test]
    fn install_invocation_uses_environment_interpreter() {
        let packages = vec!["pip".to_string(), "setuptools".to_string()];
        let inv = PythonRuntime::install_invocation(Path::new("/envs/web"), &packages);

        assert_eq!(inv.program(), Path::new("/envs/web/bin/python"));
        let args = inv.arg_strings();
        assert_eq!(&args[..4], &["-m", "pip", "install", "--upgrade"]);
        assert!(args.ends_with(&packages));
    }

    #[test]
    fn missing_interpreter_is_subprocess_failure() {
        let runtime = PythonRuntime::new("/nonexistent/python-for-veman-tests");
        let err = runtime.version().unwrap_err();
        assert!(matches!(err, VemanError::SubprocessFailure { .. }));
    }

    #[test]
    fn describe_shows_interpreter() {
        assert_eq!(PythonRuntime::new("python3").describe(), "python3");
    }
}

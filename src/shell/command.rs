//! Subprocess execution.
//!
//! Every external program veman drives (the environment-creation primitive,
//! the package installer, interpreter version checks) goes through [`run`],
//! which captures output so failures can be reported with their diagnostics.

use crate::error::{Result, VemanError};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing a subprocess.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Combined diagnostic text: stderr first, then stdout.
    pub fn diagnostics(&self) -> String {
        let mut out = String::new();
        for part in [self.stderr.trim_end(), self.stdout.trim_end()] {
            if part.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(part);
        }
        out
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Environment variables removed from the child.
    pub env_remove: Vec<String>,
}

/// A program invocation: executable plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: OsString,
    args: Vec<OsString>,
}

impl Invocation {
    /// Start an invocation of `program`.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append an argument only when `condition` holds.
    pub fn arg_if(self, condition: bool, arg: impl Into<OsString>) -> Self {
        if condition {
            self.arg(arg)
        } else {
            self
        }
    }

    /// The program being run.
    pub fn program(&self) -> &Path {
        Path::new(&self.program)
    }

    /// Arguments, lossily converted for display and assertions.
    pub fn arg_strings(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Human-readable command line.
    pub fn display(&self) -> String {
        let mut line = self.program.to_string_lossy().into_owned();
        for arg in self.arg_strings() {
            line.push(' ');
            line.push_str(&arg);
        }
        line
    }
}

/// Run an invocation to completion, capturing stdout and stderr.
///
/// A process that cannot be spawned is reported as a `SubprocessFailure`
/// with no exit code. A non-zero exit is returned as a failed
/// [`CommandResult`]; use [`run_checked`] to turn it into an error.
pub fn run(invocation: &Invocation, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();
    let command_line = invocation.display();
    tracing::debug!("Running: {}", command_line);

    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    for key in &options.env_remove {
        cmd.env_remove(key);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let output = cmd.output().map_err(|e| VemanError::SubprocessFailure {
        command: command_line.clone(),
        code: None,
        output: e.to_string(),
    })?;

    let duration = start.elapsed();
    let result = CommandResult {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        duration,
        success: output.status.success(),
    };

    tracing::debug!(
        "Finished in {:?} with exit code {:?}: {}",
        duration,
        result.exit_code,
        command_line
    );

    Ok(result)
}

/// Run an invocation and fail with `SubprocessFailure` on non-zero exit.
pub fn run_checked(invocation: &Invocation, options: &CommandOptions) -> Result<CommandResult> {
    let result = run(invocation, options)?;
    if result.success {
        Ok(result)
    } else {
        Err(VemanError::SubprocessFailure {
            command: invocation.display(),
            code: result.exit_code,
            output: result.diagnostics(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Invocation {
        Invocation::new("sh").arg("-c").arg(script)
    }

    #[test]
    fn run_captures_stdout() {
        let result = run(&sh("echo hello"), &CommandOptions::default()).unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[test]
    fn run_reports_failure_without_error() {
        let result = run(&sh("exit 3"), &CommandOptions::default()).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn run_checked_carries_diagnostics() {
        let err = run_checked(&sh("echo broken >&2; exit 1"), &CommandOptions::default())
            .unwrap_err();

        match err {
            VemanError::SubprocessFailure { code, output, .. } => {
                assert_eq!(code, Some(1));
                assert!(output.contains("broken"));
            }
            other => panic!("Expected SubprocessFailure, got {:?}", other),
        }
    }

    #[test]
    fn run_missing_program_is_subprocess_failure() {
        let inv = Invocation::new("/nonexistent/veman-test-binary");
        let err = run(&inv, &CommandOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            VemanError::SubprocessFailure { code: None, .. }
        ));
    }

    #[test]
    fn run_with_env() {
        let mut options = CommandOptions::default();
        options
            .env
            .insert("MY_VAR".to_string(), "my_value".to_string());

        let result = run(&sh("echo $MY_VAR"), &options).unwrap();

        assert!(result.stdout.contains("my_value"));
    }

    #[test]
    fn run_with_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        let options = CommandOptions {
            cwd: Some(temp.path().to_path_buf()),
            ..Default::default()
        };

        let result = run(&sh("pwd"), &options).unwrap();

        assert!(result.success);
        let name = temp.path().file_name().unwrap().to_string_lossy();
        assert!(result.stdout.contains(name.as_ref()));
    }

    #[test]
    fn invocation_display_joins_args() {
        let inv = Invocation::new("python3")
            .args(["-m", "venv"])
            .arg_if(true, "--without-pip")
            .arg_if(false, "--system-site-packages")
            .arg("/tmp/env");

        assert_eq!(inv.display(), "python3 -m venv --without-pip /tmp/env");
        assert_eq!(inv.program(), Path::new("python3"));
    }

    #[test]
    fn diagnostics_joins_streams() {
        let result = CommandResult {
            exit_code: Some(1),
            stdout: "out\n".into(),
            stderr: "err\n".into(),
            duration: Duration::from_millis(1),
            success: false,
        };
        assert_eq!(result.diagnostics(), "err\nout");
    }
}

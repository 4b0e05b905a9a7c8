//! Platform-specific shell detection.

use std::path::PathBuf;

/// Information about the invoking shell.
#[derive(Debug, Clone)]
pub struct ShellInfo {
    /// Shell executable path.
    pub executable: PathBuf,

    /// Shell family.
    pub name: ShellType,

    /// Startup file where the shell integration belongs.
    pub rc_file: Option<PathBuf>,
}

impl ShellInfo {
    /// Whether activation scripts can be evaluated by this shell.
    pub fn supports_activation(&self) -> bool {
        self.name == ShellType::Bash
    }
}

/// Known shell types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
    Sh,
    Unknown,
}

impl ShellType {
    /// Parse shell type from executable name.
    pub fn from_executable(exe: &str) -> Self {
        let name = std::path::Path::new(exe)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        match name.as_str() {
            "bash" => ShellType::Bash,
            "zsh" => ShellType::Zsh,
            "fish" => ShellType::Fish,
            "sh" | "dash" => ShellType::Sh,
            _ => ShellType::Unknown,
        }
    }

    /// Short lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            ShellType::Bash => "bash",
            ShellType::Zsh => "zsh",
            ShellType::Fish => "fish",
            ShellType::Sh => "sh",
            ShellType::Unknown => "unknown",
        }
    }
}

/// Detect the invoking shell from `$SHELL`.
pub fn detect_shell() -> ShellInfo {
    let executable = std::env::var("SHELL")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/bin/sh"));
    let shell_type = ShellType::from_executable(&executable.to_string_lossy());

    ShellInfo {
        executable,
        name: shell_type,
        rc_file: rc_file(shell_type),
    }
}

fn rc_file(shell_type: ShellType) -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    match shell_type {
        ShellType::Bash => Some(home.join(".bashrc")),
        ShellType::Zsh => Some(home.join(".zshrc")),
        ShellType::Fish => Some(home.join(".config/fish/config.fish")),
        ShellType::Sh => Some(home.join(".profile")),
        ShellType::Unknown => None,
    }
}

/// Name of the host operating system, if supported.
///
/// Only Linux and macOS are supported hosts.
pub fn supported_os() -> Option<&'static str> {
    match std::env::consts::OS {
        "linux" => Some("Linux"),
        "macos" => Some("Mac OS"),
        _ => None,
    }
}

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    const CI_VARS: &[&str] = &["CI", "GITHUB_ACTIONS", "GITLAB_CI", "CIRCLECI", "TRAVIS"];
    CI_VARS.iter().any(|var| std::env::var(var).is_ok())
}

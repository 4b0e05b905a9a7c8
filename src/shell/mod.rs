//! Subprocess execution, shell detection and shell quoting.

pub mod command;
pub mod platform;
pub mod quote;

pub use command::{run, run_checked, CommandOptions, CommandResult, Invocation};
pub use platform::{detect_shell, is_ci, supported_os, ShellInfo, ShellType};
pub use quote::{quote, quote_path};

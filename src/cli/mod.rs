//! Command-line interface for veman.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    ActivateArgs, BuildFlags, Cli, Commands, CompletionsArgs, CreateArgs, DeleteArgs, HistoryArgs,
    TempArgs, UpgradeArgs,
};
pub use commands::{Command, CommandDispatcher, CommandResult, Context};

//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Every command receives the shared
//! [`Context`]: registry, configuration, runtime and the caller's
//! activation session.

pub mod activate;
pub mod completions;
pub mod context;
pub mod create;
pub mod delete;
pub mod dispatcher;
pub mod history;
pub mod init;
pub mod list;
pub mod select;
pub mod temp;
pub mod upgrade;

pub use context::Context;
pub use dispatcher::{Command, CommandDispatcher, CommandResult};

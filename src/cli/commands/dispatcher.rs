//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use clap::CommandFactory;

use crate::activation::ActivationScript;
use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::ui::UserInterface;

use super::Context;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,

    /// Script for the calling shell to evaluate, printed on stdout.
    pub script: Option<ActivationScript>,
}

impl CommandResult {
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
            script: None,
        }
    }

    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
            script: None,
        }
    }

    /// A successful result carrying an activation script.
    pub fn with_script(script: ActivationScript) -> Self {
        Self {
            success: true,
            exit_code: 0,
            script: Some(script),
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    context: Context,
}

impl CommandDispatcher {
    pub fn new(context: Context) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = &self.context;
        match &cli.command {
            Some(Commands::Create(args)) => {
                super::create::CreateCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::Activate(args)) => {
                super::activate::ActivateCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::Delete(args)) => {
                super::delete::DeleteCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::List) => super::list::ListCommand::new(ctx).execute(ui),
            Some(Commands::History(args)) => {
                super::history::HistoryCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::Temp(args)) => {
                super::temp::TempCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::Upgrade(args)) => {
                super::upgrade::UpgradeCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::Init) => super::init::InitCommand.execute(ui),
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            None if cli.context => {
                ctx.show(ui);
                Ok(CommandResult::success())
            }
            None => {
                let help = Cli::command().render_help();
                eprintln!("{}", help);
                Ok(CommandResult::failure(2))
            }
        }
    }
}

//! Activate command implementation.
//!
//! Prints the script that the shell integration evaluates; the binary
//! itself cannot change its parent shell.

use crate::activation;
use crate::cli::args::ActivateArgs;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::select::resolve_environment;
use super::Context;

/// The activate command implementation.
pub struct ActivateCommand<'a> {
    ctx: &'a Context,
    args: ActivateArgs,
}

impl<'a> ActivateCommand<'a> {
    pub fn new(ctx: &'a Context, args: ActivateArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for ActivateCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let env = resolve_environment(&self.ctx.store, self.args.name.as_deref(), ui)?;
        let script = activation::activate(&env)?;
        tracing::debug!("activating {}", env.name);
        Ok(CommandResult::with_script(script))
    }
}

//! History command implementation.
//!
//! The `veman history` command prints recorded shell history on stdout.

use crate::cli::args::HistoryArgs;
use crate::error::Result;
use crate::history::HistoryManager;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::select::resolve_environment;
use super::Context;

/// The history command implementation.
pub struct HistoryCommand<'a> {
    ctx: &'a Context,
    args: HistoryArgs,
}

impl<'a> HistoryCommand<'a> {
    pub fn new(ctx: &'a Context, args: HistoryArgs) -> Self {
        Self { ctx, args }
    }

    fn show_all(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let all = HistoryManager::new(&self.ctx.store).history_for_all()?;
        for entry in &all.entries {
            ui.message(&entry.render(self.args.verbose));
        }
        for (name, err) in &all.failures {
            ui.error(&format!("Could not read history of {}: {}", name, err));
        }
        if all.has_failures() {
            return Ok(CommandResult::failure(1));
        }
        Ok(CommandResult::success())
    }
}

impl Command for HistoryCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.args.all {
            return self.show_all(ui);
        }

        let name = match &self.args.name {
            Some(name) => name.clone(),
            None => resolve_environment(&self.ctx.store, None, ui)?.name,
        };
        let lines = HistoryManager::new(&self.ctx.store).history_for_single(&name)?;
        for line in lines {
            if self.args.verbose {
                ui.message(&format!("[{}] {}", name, line));
            } else {
                ui.message(&line);
            }
        }
        Ok(CommandResult::success())
    }
}

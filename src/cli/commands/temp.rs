//! Temp command implementation.
//!
//! Builds a throwaway environment and prints its activation script; the
//! environment is removed when that activation ends.

use crate::activation::ActivationScript;
use crate::cli::args::TempArgs;
use crate::error::Result;
use crate::temp::TempEnvironmentManager;
use crate::ui::UserInterface;

use super::create::{create_options, report_build_failure};
use super::dispatcher::{Command, CommandResult};
use super::Context;

/// The temp command implementation.
pub struct TempCommand<'a> {
    ctx: &'a Context,
    args: TempArgs,
}

impl<'a> TempCommand<'a> {
    pub fn new(ctx: &'a Context, args: TempArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for TempCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let options = create_options(&self.args.flags, &self.ctx.config.defaults, None);
        let builder = self.ctx.builder();
        let manager = TempEnvironmentManager::new(&self.ctx.store, &builder);

        let mut spinner = ui.start_spinner("Creating temporary environment");
        match manager.create_temp(&options) {
            Ok(env) => {
                spinner.finish_success(&format!("Created {}", env.name));
                Ok(CommandResult::with_script(ActivationScript::for_environment(
                    &env,
                )))
            }
            Err(err) => {
                spinner.finish_error("Failed to create temporary environment");
                report_build_failure(
                    ui,
                    &err,
                    "The partial environment was left in the registry; remove it with `veman delete <name>`",
                );
                Ok(CommandResult::failure(1))
            }
        }
    }
}

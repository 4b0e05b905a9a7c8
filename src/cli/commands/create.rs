//! Create command implementation.
//!
//! The `veman create` command builds a new named environment.

use crate::activation::ActivationScript;
use crate::cli::args::{BuildFlags, CreateArgs};
use crate::config::CreateDefaults;
use crate::error::{Result, VemanError};
use crate::store::{CreateOptions, EnvironmentName};
use crate::ui::{Prompt, UserInterface};

use super::dispatcher::{Command, CommandResult};
use super::Context;

/// Creation options from command-line flags, falling back to configured defaults.
pub(crate) fn create_options(
    flags: &BuildFlags,
    defaults: &CreateDefaults,
    prompt: Option<String>,
) -> CreateOptions {
    CreateOptions {
        system_site_packages: flags.system_site_packages || defaults.system_site_packages,
        with_pip: !(flags.without_pip || defaults.without_pip),
        prompt,
    }
}

/// Report a failed creation primitive or installer run.
pub(crate) fn report_build_failure(ui: &mut dyn UserInterface, err: &VemanError, hint: &str) {
    if let VemanError::SubprocessFailure {
        command, output, ..
    } = err
    {
        ui.show_error_block(command, output, Some(hint));
    } else {
        ui.error(&err.to_string());
        ui.show_hint(hint);
    }
}

/// The create command implementation.
pub struct CreateCommand<'a> {
    ctx: &'a Context,
    args: CreateArgs,
}

impl<'a> CreateCommand<'a> {
    pub fn new(ctx: &'a Context, args: CreateArgs) -> Self {
        Self { ctx, args }
    }

    fn name(&self, ui: &mut dyn UserInterface) -> Result<EnvironmentName> {
        let raw = match &self.args.name {
            Some(name) => name.clone(),
            None => ui
                .prompt(&Prompt::input("name", "Environment name"))?
                .as_string(),
        };
        EnvironmentName::parse(raw.trim())
    }

    /// Whether to replace an existing environment.
    fn overwrite(&self, name: &EnvironmentName, ui: &mut dyn UserInterface) -> Result<bool> {
        if self.args.overwrite || !self.ctx.store.exists(name) || !ui.is_interactive() {
            return Ok(self.args.overwrite);
        }
        let question = format!("Environment '{}' already exists. Replace it?", name);
        Ok(ui.prompt(&Prompt::confirm("overwrite", &question, false))?.as_bool())
    }
}

impl Command for CreateCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let name = self.name(ui)?;
        let overwrite = self.overwrite(&name, ui)?;
        let options = create_options(
            &self.args.flags,
            &self.ctx.config.defaults,
            self.args.prompt.clone(),
        );

        let builder = self.ctx.builder();
        let mut spinner = ui.start_spinner(&format!("Creating {}", name));
        let env = match self.ctx.store.create(&name, &options, overwrite, &builder) {
            Ok(env) => env,
            Err(err @ VemanError::AlreadyExists { .. }) => {
                spinner.finish_skipped(&format!("{} already exists", name));
                return Err(err);
            }
            Err(err) => {
                spinner.finish_error(&format!("Failed to create {}", name));
                let hint = format!(
                    "The partial environment was left in place; retry with: veman create {} --overwrite",
                    name
                );
                report_build_failure(ui, &err, &hint);
                return Ok(CommandResult::failure(1));
            }
        };
        spinner.finish_success(&format!("Created {}", env.name));

        if self.args.activate {
            return Ok(CommandResult::with_script(ActivationScript::for_environment(
                &env,
            )));
        }
        Ok(CommandResult::success())
    }
}

//! Delete command implementation.

use crate::cli::args::DeleteArgs;
use crate::error::Result;
use crate::ui::{Prompt, UserInterface};

use super::dispatcher::{Command, CommandResult};
use super::select::resolve_environment;
use super::Context;

/// The delete command implementation.
pub struct DeleteCommand<'a> {
    ctx: &'a Context,
    args: DeleteArgs,
}

impl<'a> DeleteCommand<'a> {
    pub fn new(ctx: &'a Context, args: DeleteArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for DeleteCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        // A named target may be a leftover from a failed build, which is
        // not listed and cannot be loaded; only selection goes through the store.
        let name = match &self.args.name {
            Some(name) => name.clone(),
            None => resolve_environment(&self.ctx.store, None, ui)?.name,
        };

        if !self.args.yes && ui.is_interactive() {
            let question = format!("Delete environment '{}'?", name);
            if !ui.prompt(&Prompt::confirm("delete", &question, false))?.as_bool() {
                ui.warning("Aborted");
                return Ok(CommandResult::failure(1));
            }
        }

        self.ctx.store.delete(&name, &self.ctx.session)?;
        ui.success(&format!("Deleted {}", name));
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::session::VAR_ACTIVE_PATH;
    use crate::activation::ActivationSession;
    use crate::config::VemanConfig;
    use crate::error::VemanError;
    use crate::runtime::MockRuntime;
    use crate::store::{CreateOptions, EnvironmentName, EnvironmentStore};
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn context(temp: &TempDir, session: ActivationSession) -> Context {
        let ctx = Context::with_parts(
            EnvironmentStore::new(temp.path().join("env")),
            VemanConfig::default(),
            session,
            Box::new(MockRuntime::new()),
        );
        let name = EnvironmentName::parse("web").unwrap();
        ctx.store
            .create(&name, &CreateOptions::default(), false, &ctx.builder())
            .unwrap();
        ctx
    }

    fn args(yes: bool) -> DeleteArgs {
        DeleteArgs {
            name: Some("web".into()),
            yes,
        }
    }

    #[test]
    fn deletes_without_prompt_when_non_interactive() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp, ActivationSession::default());
        let mut ui = MockUI::new();

        let result = DeleteCommand::new(&ctx, args(false)).execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.prompts_shown().is_empty());
        assert!(!temp.path().join("env/web").exists());
    }

    #[test]
    fn declined_confirmation_keeps_environment() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp, ActivationSession::default());
        let mut ui = MockUI::new();
        ui.set_interactive(true);
        ui.set_prompt_response("delete", "n");

        let result = DeleteCommand::new(&ctx, args(false)).execute(&mut ui).unwrap();

        assert!(!result.success);
        assert!(temp.path().join("env/web").exists());
    }

    #[test]
    fn yes_flag_skips_confirmation() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp, ActivationSession::default());
        let mut ui = MockUI::new();
        ui.set_interactive(true);

        DeleteCommand::new(&ctx, args(true)).execute(&mut ui).unwrap();

        assert!(ui.prompts_shown().is_empty());
        assert!(!temp.path().join("env/web").exists());
    }

    #[test]
    fn refuses_active_environment() {
        let temp = TempDir::new().unwrap();
        let active = temp.path().join("env/web").to_string_lossy().to_string();
        let ctx = context(&temp, ActivationSession::from_vars([(VAR_ACTIVE_PATH, active)]));
        let mut ui = MockUI::new();

        let err = DeleteCommand::new(&ctx, args(true))
            .execute(&mut ui)
            .unwrap_err();

        assert!(matches!(err, VemanError::EnvironmentActive { .. }));
        assert!(temp.path().join("env/web").exists());
    }
}

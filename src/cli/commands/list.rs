//! List command implementation.
//!
//! The `veman list` command prints environment names, one per line, on
//! stdout.

use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::Context;

/// The list command implementation.
pub struct ListCommand<'a> {
    ctx: &'a Context,
}

impl<'a> ListCommand<'a> {
    pub fn new(ctx: &'a Context) -> Self {
        Self { ctx }
    }
}

impl Command for ListCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let envs = self.ctx.store.list()?;
        if envs.is_empty() {
            ui.show_hint("No environments yet; create one with `veman create <name>`");
        }
        for env in &envs {
            ui.message(&env.name);
        }
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationSession;
    use crate::config::VemanConfig;
    use crate::runtime::MockRuntime;
    use crate::store::{CreateOptions, EnvironmentName, EnvironmentStore};
    use crate::temp::TempEnvironmentManager;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    #[test]
    fn lists_sorted_names_without_temporaries() {
        let temp = TempDir::new().unwrap();
        let ctx = Context::with_parts(
            EnvironmentStore::new(temp.path().join("env")),
            VemanConfig::default(),
            ActivationSession::default(),
            Box::new(MockRuntime::new()),
        );
        let builder = ctx.builder();
        for name in ["web", "api"] {
            let name = EnvironmentName::parse(name).unwrap();
            ctx.store
                .create(&name, &CreateOptions::default(), false, &builder)
                .unwrap();
        }
        TempEnvironmentManager::new(&ctx.store, &builder)
            .create_temp(&CreateOptions::default())
            .unwrap();

        let mut ui = MockUI::new();
        ListCommand::new(&ctx).execute(&mut ui).unwrap();

        assert_eq!(ui.messages(), ["api", "web"]);
    }

    #[test]
    fn empty_registry_prints_nothing() {
        let temp = TempDir::new().unwrap();
        let ctx = Context::with_parts(
            EnvironmentStore::new(temp.path().join("missing")),
            VemanConfig::default(),
            ActivationSession::default(),
            Box::new(MockRuntime::new()),
        );
        let mut ui = MockUI::new();

        let result = ListCommand::new(&ctx).execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.messages().is_empty());
        assert_eq!(ui.hints().len(), 1);
    }
}

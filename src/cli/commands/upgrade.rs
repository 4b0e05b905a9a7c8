//! Upgrade command implementation.
//!
//! Runs the selected components against one environment, or every
//! environment with `--all`, and reports each component's outcome.

use crate::cli::args::UpgradeArgs;
use crate::error::{Result, VemanError};
use crate::ui::{format_duration, SpinnerHandle, UserInterface};
use crate::upgrade::{Components, EnvironmentReport, UpgradeEvent, UpgradeOrchestrator};

use super::dispatcher::{Command, CommandResult};
use super::select::resolve_environment;
use super::Context;

/// The upgrade command implementation.
pub struct UpgradeCommand<'a> {
    ctx: &'a Context,
    args: UpgradeArgs,
}

impl<'a> UpgradeCommand<'a> {
    pub fn new(ctx: &'a Context, args: UpgradeArgs) -> Self {
        Self { ctx, args }
    }

    fn components(&self) -> Components {
        Components {
            deps: self.args.deps,
            python: self.args.python,
            scripts: self.args.scripts,
        }
    }

    fn report_failures(&self, env: &EnvironmentReport, ui: &mut dyn UserInterface) {
        for outcome in env.failures() {
            let Some(err) = &outcome.error else {
                continue;
            };
            match err {
                VemanError::SubprocessFailure {
                    command, output, ..
                } if err.diagnostic_output().is_some() => {
                    let hint = format!("{} upgrade of {} failed", outcome.component, env.name);
                    ui.show_error_block(command, output, Some(&hint));
                }
                _ => ui.error(&format!("{} {}: {}", env.name, outcome.component, err)),
            }
        }
    }
}

impl Command for UpgradeCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let name = match (&self.args.name, self.args.all) {
            (Some(name), _) => Some(name.clone()),
            (None, true) => None,
            (None, false) => Some(resolve_environment(&self.ctx.store, None, ui)?.name),
        };

        if self.args.all {
            ui.show_header("Upgrading all environments");
        }

        let builder = self.ctx.builder();
        let orchestrator = UpgradeOrchestrator::new(&self.ctx.store, &builder);
        let components = self.components();

        let mut spinner: Option<Box<dyn SpinnerHandle>> = None;
        let report = orchestrator.upgrade_with_progress(
            name.as_deref(),
            components,
            self.args.all,
            |event| match event {
                UpgradeEvent::Started {
                    environment,
                    component,
                } => {
                    spinner = Some(ui.start_spinner(&format!(
                        "Upgrading {} of {}",
                        component, environment
                    )));
                }
                UpgradeEvent::Finished {
                    environment,
                    component,
                    succeeded,
                } => {
                    if let Some(mut s) = spinner.take() {
                        if succeeded {
                            s.finish_success(&format!("{}: {}", environment, component));
                        } else {
                            s.finish_error(&format!("{}: {} failed", environment, component));
                        }
                    }
                }
            },
        )?;

        if self.args.all && report.total() == 0 {
            ui.show_hint("No environments to upgrade");
        }

        let verbose = ui.output_mode().shows_commands();
        for env in &report.environments {
            for outcome in env.components.iter().filter(|o| o.succeeded()) {
                let line = format!(
                    "{} {} done in {}{}",
                    env.name,
                    outcome.component,
                    format_duration(outcome.duration),
                    outcome
                        .detail
                        .as_deref()
                        .map(|d| format!(" ({})", d))
                        .unwrap_or_default()
                );
                tracing::info!("{}", line);
                if verbose {
                    ui.show_hint(&line);
                }
            }
            self.report_failures(env, ui);
        }
        for (name, err) in &report.skipped {
            ui.error(&format!("{} skipped: {}", name, err));
        }

        if report.total() > 1 {
            ui.show_table(&report.summary_table(&components.selected()));
        }

        if report.succeeded() {
            Ok(CommandResult::success())
        } else {
            ui.error(&format!(
                "{} of {} environment(s) had failed components",
                report.failed_count(),
                report.total()
            ));
            Ok(CommandResult::failure(1))
        }
    }
}

//! In-place upgrade of existing environments.
//!
//! Each selected [`Component`] runs independently: a failure is recorded in
//! the [`UpgradeReport`] and the remaining components (and, with `--all`,
//! the remaining environments) still run. Upgrading never creates an
//! environment.

pub mod report;

pub use report::{Component, ComponentOutcome, EnvironmentReport, UpgradeReport};

use std::time::Instant;

use crate::builder::EnvironmentBuilder;
use crate::error::{Result, VemanError};
use crate::store::{Environment, EnvironmentStore};

/// Component selection from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Components {
    pub deps: bool,
    pub python: bool,
    pub scripts: bool,
}

impl Components {
    /// Selected components in execution order; none selected means all.
    pub fn selected(&self) -> Vec<Component> {
        if !self.deps && !self.python && !self.scripts {
            return Component::ALL.to_vec();
        }
        Component::ALL
            .into_iter()
            .filter(|c| match c {
                Component::Deps => self.deps,
                Component::Python => self.python,
                Component::Scripts => self.scripts,
            })
            .collect()
    }
}

/// Progress notifications for long-running components.
#[derive(Debug, Clone, Copy)]
pub enum UpgradeEvent<'e> {
    Started {
        environment: &'e str,
        component: Component,
    },
    Finished {
        environment: &'e str,
        component: Component,
        succeeded: bool,
    },
}

/// Applies upgrade components to environments in a store.
pub struct UpgradeOrchestrator<'a> {
    store: &'a EnvironmentStore,
    builder: &'a EnvironmentBuilder<'a>,
}

impl<'a> UpgradeOrchestrator<'a> {
    pub fn new(store: &'a EnvironmentStore, builder: &'a EnvironmentBuilder<'a>) -> Self {
        Self { store, builder }
    }

    /// Upgrade `name`, or every non-temporary environment when `all` is set.
    ///
    /// Fails with `NotFound` when `name` does not resolve; nothing is created.
    /// When scripts are selected, a named environment that lost its
    /// activation script artifact still resolves so the artifact is rebuilt.
    pub fn upgrade(
        &self,
        name: Option<&str>,
        components: Components,
        all: bool,
    ) -> Result<UpgradeReport> {
        self.upgrade_with_progress(name, components, all, |_| {})
    }

    /// Like [`upgrade`](Self::upgrade), reporting progress to `on_event`.
    pub fn upgrade_with_progress<F>(
        &self,
        name: Option<&str>,
        components: Components,
        all: bool,
        mut on_event: F,
    ) -> Result<UpgradeReport>
    where
        F: FnMut(UpgradeEvent<'_>),
    {
        let mut report = UpgradeReport::default();
        let targets = if all {
            if let Some(name) = name {
                tracing::warn!("ignoring environment name {} with --all", name);
            }
            let mut scan = self.store.scan()?;
            report.skipped = std::mem::take(&mut scan.failures);
            scan.listed()
        } else {
            let name = name.ok_or_else(|| {
                VemanError::Other(anyhow::anyhow!("no environment given to upgrade"))
            })?;
            let env = if components.selected().contains(&Component::Scripts) {
                self.store.get_repairable(name)?
            } else {
                self.store.get(name)?
            };
            vec![env]
        };

        let selected = components.selected();
        for env in targets {
            report
                .environments
                .push(self.upgrade_environment(env, &selected, &mut on_event));
        }
        Ok(report)
    }

    fn upgrade_environment<F>(
        &self,
        mut env: Environment,
        components: &[Component],
        on_event: &mut F,
    ) -> EnvironmentReport
    where
        F: FnMut(UpgradeEvent<'_>),
    {
        let name = env.name.clone();
        let mut outcomes = Vec::with_capacity(components.len());

        for &component in components {
            on_event(UpgradeEvent::Started {
                environment: &name,
                component,
            });
            let start = Instant::now();
            let result = self.run_component(&mut env, component);
            let outcome = match result {
                Ok(detail) => ComponentOutcome::success(component, start.elapsed(), detail),
                Err(e) => {
                    tracing::warn!("upgrade {} of {} failed: {}", component, name, e);
                    ComponentOutcome::failure(component, start.elapsed(), e)
                }
            };
            on_event(UpgradeEvent::Finished {
                environment: &name,
                component,
                succeeded: outcome.succeeded(),
            });
            outcomes.push(outcome);
        }

        EnvironmentReport {
            name,
            components: outcomes,
        }
    }

    fn run_component(&self, env: &mut Environment, component: Component) -> Result<Option<String>> {
        match component {
            Component::Python => {
                let version = self.builder.relink_interpreter(env)?;
                Ok(Some(format!("interpreter {}", version)))
            }
            Component::Deps => {
                if !env.created_with.with_pip {
                    return Ok(Some("installer disabled at creation; skipped".to_string()));
                }
                self.builder.install_core_tooling(&env.root)?;
                Ok(Some(self.builder.core_packages().join(", ")))
            }
            Component::Scripts => {
                self.builder.regenerate_scripts(env)?;
                Ok(None)
            }
        }
    }
}

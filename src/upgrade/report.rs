//! Per-environment, per-component upgrade outcomes.

use std::fmt;
use std::time::Duration;

use crate::error::VemanError;
use crate::ui::Table;

/// An independently selectable part of the upgrade workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// Reinstall/upgrade the installer and build tooling.
    Deps,
    /// Relink the interpreter to the current one.
    Python,
    /// Regenerate the activation script artifact.
    Scripts,
}

impl Component {
    /// Every component, in execution order.
    pub const ALL: [Component; 3] = [Component::Python, Component::Deps, Component::Scripts];
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Component::Deps => "deps",
            Component::Python => "python",
            Component::Scripts => "scripts",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of one component on one environment.
#[derive(Debug)]
pub struct ComponentOutcome {
    pub component: Component,
    pub duration: Duration,
    pub detail: Option<String>,
    pub error: Option<VemanError>,
}

impl ComponentOutcome {
    pub fn success(component: Component, duration: Duration, detail: Option<String>) -> Self {
        Self {
            component,
            duration,
            detail,
            error: None,
        }
    }

    pub fn failure(component: Component, duration: Duration, error: VemanError) -> Self {
        Self {
            component,
            duration,
            detail: None,
            error: Some(error),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcomes for one environment.
#[derive(Debug)]
pub struct EnvironmentReport {
    pub name: String,
    pub components: Vec<ComponentOutcome>,
}

impl EnvironmentReport {
    pub fn succeeded(&self) -> bool {
        self.components.iter().all(ComponentOutcome::succeeded)
    }

    /// The outcome for `component`, if it was selected.
    pub fn outcome(&self, component: Component) -> Option<&ComponentOutcome> {
        self.components.iter().find(|c| c.component == component)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ComponentOutcome> {
        self.components.iter().filter(|c| !c.succeeded())
    }
}

/// Aggregate result of an upgrade run.
#[derive(Debug, Default)]
pub struct UpgradeReport {
    pub environments: Vec<EnvironmentReport>,

    /// Environments that could not be loaded, so no component ran.
    pub skipped: Vec<(String, VemanError)>,
}

impl UpgradeReport {
    pub fn succeeded(&self) -> bool {
        self.skipped.is_empty() && self.environments.iter().all(EnvironmentReport::succeeded)
    }

    /// Number of environments targeted, skipped ones included.
    pub fn total(&self) -> usize {
        self.environments.len() + self.skipped.len()
    }

    /// Number of environments with a failed component or none run at all.
    pub fn failed_count(&self) -> usize {
        self.environments.iter().filter(|e| !e.succeeded()).count() + self.skipped.len()
    }

    /// Summary table: one row per environment, one column per component.
    pub fn summary_table(&self, components: &[Component]) -> Table {
        let headers = std::iter::once("environment".to_string())
            .chain(components.iter().map(|c| c.to_string()));
        let mut table = Table::new(headers);

        for env in &self.environments {
            let mut row = vec![env.name.clone()];
            for component in components {
                let cell = match env.outcome(*component) {
                    Some(outcome) if outcome.succeeded() => "ok",
                    Some(_) => "failed",
                    None => "-",
                };
                row.push(cell.to_string());
            }
            table.add_row(row);
        }
        for (name, _) in &self.skipped {
            table.add_row(std::iter::once(name.as_str()).chain(components.iter().map(|_| "skipped")));
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(component: Component) -> ComponentOutcome {
        ComponentOutcome::failure(
            component,
            Duration::ZERO,
            VemanError::NotFound {
                name: "x".into(),
            },
        )
    }

    fn report() -> UpgradeReport {
        UpgradeReport {
            environments: vec![
                EnvironmentReport {
                    name: "good".into(),
                    components: vec![
                        ComponentOutcome::success(Component::Deps, Duration::ZERO, None),
                        ComponentOutcome::success(Component::Scripts, Duration::ZERO, None),
                    ],
                },
                EnvironmentReport {
                    name: "bad".into(),
                    components: vec![
                        failed(Component::Deps),
                        ComponentOutcome::success(Component::Scripts, Duration::ZERO, None),
                    ],
                },
            ],
            skipped: Vec::new(),
        }
    }

    #[test]
    fn aggregates_failures() {
        let report = report();
        assert!(!report.succeeded());
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.environments[1].failures().count(), 1);
    }

    #[test]
    fn summary_marks_each_component() {
        let table = report().summary_table(&[Component::Deps, Component::Scripts]);
        let rendered = table.render();
        assert_eq!(table.row_count(), 2);
        assert!(rendered.contains("failed"));
        assert!(rendered.contains("scripts"));
    }

    #[test]
    fn skipped_environments_count_as_failures() {
        let mut report = report();
        report.skipped.push((
            "broken".into(),
            VemanError::ConfigParseError {
                path: "broken/.veman.yml".into(),
                message: "unexpected end of stream".into(),
            },
        ));

        assert_eq!(report.total(), 3);
        assert_eq!(report.failed_count(), 2);
        let table = report.summary_table(&[Component::Deps]);
        assert_eq!(table.row_count(), 3);
        assert!(table.render().contains("skipped"));
    }

    #[test]
    fn execution_order_relinks_before_installing() {
        assert_eq!(Component::ALL[0], Component::Python);
        assert_eq!(Component::Python.to_string(), "python");
    }
}

//! Shared command context and the `--context` report.

use std::path::{Path, PathBuf};

use crate::activation::ActivationSession;
use crate::builder::EnvironmentBuilder;
use crate::config::{self, VemanConfig};
use crate::error::Result;
use crate::runtime::{PythonRuntime, Runtime};
use crate::shell::{detect_shell, supported_os, ShellInfo};
use crate::store::EnvironmentStore;
use crate::ui::UserInterface;

/// Everything a command needs besides its arguments.
pub struct Context {
    pub store: EnvironmentStore,
    pub config: VemanConfig,
    pub config_path: Option<PathBuf>,
    pub session: ActivationSession,
    pub shell: ShellInfo,
    pub runtime: Box<dyn Runtime>,
}

impl Context {
    /// Load configuration and session state from the process environment.
    ///
    /// `env_dir` is the `--env-dir`/`VEMAN_ENV_DIR` override.
    pub fn load(env_dir: Option<&Path>) -> Result<Self> {
        let settings = config::load_config()?;
        let root = config::resolve_registry_root(env_dir, &settings);
        tracing::debug!("registry root: {}", root.display());

        let runtime: Box<dyn Runtime> = Box::new(PythonRuntime::new(&settings.python));
        Ok(Self {
            store: EnvironmentStore::new(root),
            config: settings,
            config_path: config::config_path(),
            session: ActivationSession::from_env(),
            shell: detect_shell(),
            runtime,
        })
    }

    /// Assemble a context from parts (for tests and embedding).
    pub fn with_parts(
        store: EnvironmentStore,
        config: VemanConfig,
        session: ActivationSession,
        runtime: Box<dyn Runtime>,
    ) -> Self {
        Self {
            store,
            config,
            config_path: None,
            session,
            shell: detect_shell(),
            runtime,
        }
    }

    /// A builder over this context's runtime and core packages.
    pub fn builder(&self) -> EnvironmentBuilder<'_> {
        EnvironmentBuilder::new(self.runtime.as_ref(), self.config.core_packages.clone())
    }

    /// `key: value` lines describing the host and configuration.
    pub fn report(&self) -> Vec<(&'static str, String)> {
        let interpreter = match self.runtime.version() {
            Ok(version) => format!("{} ({})", self.runtime.describe(), version),
            Err(_) => format!("{} (not found)", self.runtime.describe()),
        };
        let config_file = match &self.config_path {
            Some(path) if path.exists() => path.display().to_string(),
            Some(path) => format!("{} (absent)", path.display()),
            None => "none".to_string(),
        };
        let active = match (&self.session.active_name, &self.session.active_path) {
            (Some(name), _) => name.clone(),
            (None, Some(path)) => format!("{} (not managed by veman)", path.display()),
            (None, None) => "none".to_string(),
        };

        vec![
            ("version", env!("CARGO_PKG_VERSION").to_string()),
            ("os", supported_os().unwrap_or(std::env::consts::OS).to_string()),
            (
                "shell",
                format!(
                    "{} ({})",
                    self.shell.name.as_str(),
                    self.shell.executable.display()
                ),
            ),
            ("registry", self.store.root().display().to_string()),
            ("interpreter", interpreter),
            ("config", config_file),
            ("active", active),
        ]
    }

    /// Print [`report`](Self::report) as data.
    pub fn show(&self, ui: &mut dyn UserInterface) {
        for (key, value) in self.report() {
            ui.message(&format!("{:<12} {}", format!("{}:", key), value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::session::VAR_ACTIVE;
    use crate::runtime::MockRuntime;
    use crate::ui::MockUI;

    #[test]
    fn report_names_registry_and_active_environment() {
        let ctx = Context::with_parts(
            EnvironmentStore::new("/envs"),
            VemanConfig::default(),
            ActivationSession::from_vars([(VAR_ACTIVE, "web"), ("VEMAN_ACTIVE_PATH", "/envs/web")]),
            Box::new(MockRuntime::new()),
        );

        let mut ui = MockUI::new();
        ctx.show(&mut ui);

        assert!(ui.has_message("/envs"));
        assert!(ui.has_message("mock interpreter 3.12.0 (3.12.0)"));
        assert!(ui.has_message("web"));
    }

    #[test]
    fn missing_interpreter_is_reported() {
        let ctx = Context::with_parts(
            EnvironmentStore::new("/envs"),
            VemanConfig::default(),
            ActivationSession::default(),
            Box::new(MockRuntime::new().failing_version()),
        );
        let report = ctx.report();
        let interpreter = report.iter().find(|(k, _)| *k == "interpreter").unwrap();
        assert!(interpreter.1.ends_with("(not found)"));
    }
}

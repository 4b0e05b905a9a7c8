//! Per-environment shell history.
//!
//! The swap itself happens in the shell (see [`crate::activation`]); this
//! module reads the history files back for `veman history`.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Result, VemanError};
use crate::store::{Environment, EnvironmentStore};

/// One history line and the environment it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HistoryEntry {
    pub environment: String,
    pub line: String,
}

impl HistoryEntry {
    /// Render for output; `verbose` prefixes the environment name.
    pub fn render(&self, verbose: bool) -> String {
        if verbose {
            format!("[{}] {}", self.environment, self.line)
        } else {
            self.line.clone()
        }
    }
}

/// Result of reading every environment's history.
#[derive(Debug, Default)]
pub struct AllHistory {
    /// Entries, grouped by environment in directory enumeration order.
    pub entries: Vec<HistoryEntry>,

    /// Environments whose history could not be read.
    pub failures: Vec<(String, VemanError)>,
}

impl AllHistory {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Reads environment history files.
pub struct HistoryManager<'a> {
    store: &'a EnvironmentStore,
}

impl<'a> HistoryManager<'a> {
    pub fn new(store: &'a EnvironmentStore) -> Self {
        Self { store }
    }

    /// History lines of the environment called `name`, oldest first,
    /// exactly as stored (blank lines included).
    pub fn history_for_single(&self, name: &str) -> Result<Vec<String>> {
        let env = self.store.get(name)?;
        read_history(&env)
    }

    /// History of every non-temporary environment.
    ///
    /// Environments are visited in filesystem enumeration order, which is
    /// unspecified. A failure on one environment, including metadata that
    /// cannot be loaded, is recorded and the rest are still read.
    pub fn history_for_all(&self) -> Result<AllHistory> {
        let scan = self.store.scan()?;
        let mut all = AllHistory {
            failures: scan.failures,
            ..Default::default()
        };
        for env in scan.environments.into_iter().filter(|e| !e.temporary) {
            match read_history(&env) {
                Ok(lines) => all.entries.extend(lines.into_iter().map(|line| HistoryEntry {
                    environment: env.name.clone(),
                    line,
                })),
                Err(e) => {
                    tracing::warn!("could not read history of {}: {}", env.name, e);
                    all.failures.push((env.name.clone(), e));
                }
            }
        }
        Ok(all)
    }
}

/// Lines of `env`'s history file; a missing file is an empty history.
pub fn read_history(env: &Environment) -> Result<Vec<String>> {
    read_lines(&env.history_file())
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(VemanError::from_io(e, path)),
    };
    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_string)
        .collect())
}

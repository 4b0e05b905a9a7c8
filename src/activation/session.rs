//! Activation session state.
//!
//! The invoking shell owns this state; veman only reads it from the
//! variables the activation script exported, and it is passed explicitly to
//! the operations that care about it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Name of the active environment.
pub const VAR_ACTIVE: &str = "VEMAN_ACTIVE";

/// Root directory of the active environment.
pub const VAR_ACTIVE_PATH: &str = "VEMAN_ACTIVE_PATH";

/// `1` when the active environment is temporary.
pub const VAR_TEMPORARY: &str = "VEMAN_TEMPORARY";

/// History file in effect before the first activation.
pub const VAR_SAVED_HISTFILE: &str = "VEMAN_SAVED_HISTFILE";

/// Marker exported by the runtime's own activation script.
pub const VAR_VIRTUAL_ENV: &str = "VIRTUAL_ENV";

/// Session state of the invoking shell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationSession {
    /// Name of the active veman environment.
    pub active_name: Option<String>,

    /// Root of the active environment (veman's or any other runtime env).
    pub active_path: Option<PathBuf>,

    /// Whether the active environment is temporary.
    pub temporary: bool,

    /// History file to restore on deactivation.
    pub saved_histfile: Option<PathBuf>,
}

impl ActivationSession {
    /// Read session state from this process's environment.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Read session state from explicit variables.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !v.is_empty())
            .collect();

        let active_path = vars
            .get(VAR_ACTIVE_PATH)
            .or_else(|| vars.get(VAR_VIRTUAL_ENV))
            .map(PathBuf::from);

        Self {
            active_name: vars.get(VAR_ACTIVE).cloned(),
            active_path,
            temporary: vars.get(VAR_TEMPORARY).is_some_and(|v| v == "1"),
            saved_histfile: vars.get(VAR_SAVED_HISTFILE).map(PathBuf::from),
        }
    }

    /// Whether any environment is active.
    pub fn is_active(&self) -> bool {
        self.active_path.is_some()
    }

    /// Whether the environment rooted at `root` is the active one.
    pub fn is_active_root(&self, root: &Path) -> bool {
        match &self.active_path {
            Some(active) => same_path(active, root),
            None => false,
        }
    }
}

fn same_path(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_environment_is_inactive() {
        let session = ActivationSession::from_vars(Vec::<(String, String)>::new());
        assert!(!session.is_active());
        assert_eq!(session, ActivationSession::default());
    }

    #[test]
    fn reads_veman_variables() {
        let session = ActivationSession::from_vars([
            (VAR_ACTIVE, "web"),
            (VAR_ACTIVE_PATH, "/envs/web"),
            (VAR_TEMPORARY, "1"),
            (VAR_SAVED_HISTFILE, "/home/me/.bash_history"),
        ]);

        assert_eq!(session.active_name.as_deref(), Some("web"));
        assert_eq!(session.active_path, Some(PathBuf::from("/envs/web")));
        assert!(session.temporary);
        assert_eq!(
            session.saved_histfile,
            Some(PathBuf::from("/home/me/.bash_history"))
        );
    }

    #[test]
    fn falls_back_to_virtual_env_marker() {
        let session = ActivationSession::from_vars([(VAR_VIRTUAL_ENV, "/other/venv")]);
        assert!(session.is_active());
        assert!(session.active_name.is_none());
        assert!(session.is_active_root(Path::new("/other/venv")));
    }

    #[test]
    fn empty_values_are_ignored() {
        let session = ActivationSession::from_vars([(VAR_ACTIVE_PATH, ""), (VAR_TEMPORARY, "0")]);
        assert!(!session.is_active());
        assert!(!session.temporary);
    }

    #[test]
    fn active_root_compares_canonical_paths() {
        let temp = TempDir::new().unwrap();
        let env = temp.path().join("web");
        std::fs::create_dir(&env).unwrap();
        let indirect = temp.path().join(".").join("web");

        let session =
            ActivationSession::from_vars([(VAR_ACTIVE_PATH, indirect.to_string_lossy().to_string())]);

        assert!(session.is_active_root(&env));
        assert!(!session.is_active_root(temp.path()));
    }
}

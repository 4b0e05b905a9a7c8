//! On-disk layout of a managed environment.
//!
//! ```text
//! <root>/
//!   pyvenv.cfg            written by the creation primitive
//!   bin/python            interpreter link
//!   bin/activate          runtime's native activation script
//!   bin/veman_activate    activation script artifact
//!   .veman.yml            recorded metadata
//!   .veman_history        per-environment shell history
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IoResultExt, Result};

/// Config file written by the creation primitive.
pub const PYVENV_CFG: &str = "pyvenv.cfg";

/// Directory holding executables.
pub const BIN_DIR: &str = "bin";

/// Native activation script written by the creation primitive.
pub const NATIVE_ACTIVATE: &str = "activate";

/// Activation script artifact generated by veman.
pub const ARTIFACT: &str = "veman_activate";

/// Recorded environment metadata.
pub const METADATA_FILE: &str = ".veman.yml";

/// Per-environment history file.
pub const HISTORY_FILE: &str = ".veman_history";

/// Conventional interpreter names inside `bin/`.
pub const INTERPRETER_NAMES: [&str; 2] = ["python", "python3"];

pub fn bin_dir(root: &Path) -> PathBuf {
    root.join(BIN_DIR)
}

pub fn artifact_path(root: &Path) -> PathBuf {
    bin_dir(root).join(ARTIFACT)
}

pub fn native_activate_path(root: &Path) -> PathBuf {
    bin_dir(root).join(NATIVE_ACTIVATE)
}

pub fn metadata_path(root: &Path) -> PathBuf {
    root.join(METADATA_FILE)
}

pub fn history_path(root: &Path) -> PathBuf {
    root.join(HISTORY_FILE)
}

pub fn pyvenv_cfg_path(root: &Path) -> PathBuf {
    root.join(PYVENV_CFG)
}

/// Whether `path` exists as an entry, following no links.
///
/// A dangling interpreter link still counts: an environment whose base
/// interpreter was removed must stay visible so it can be upgraded.
fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Whether `dir` has the creation primitive's layout.
pub fn is_runtime_env(dir: &Path) -> bool {
    dir.is_dir()
        && pyvenv_cfg_path(dir).is_file()
        && bin_dir(dir).is_dir()
        && entry_exists(&bin_dir(dir).join("python"))
        && native_activate_path(dir).is_file()
}

/// Whether `dir` is an environment managed by veman.
pub fn is_managed(dir: &Path) -> bool {
    is_runtime_env(dir) && artifact_path(dir).is_file()
}

/// Whether `dir` looks like a build that stopped partway: it carries the
/// runtime's config or veman's metadata, or it is still empty.
pub fn is_build_leftover(dir: &Path) -> bool {
    if !dir.is_dir() {
        return false;
    }
    if pyvenv_cfg_path(dir).is_file() || metadata_path(dir).is_file() {
        return true;
    }
    fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

/// Parse `pyvenv.cfg` into key/value pairs.
///
/// Keys are lowercased; lines without `=` are ignored.
pub fn read_pyvenv_cfg(root: &Path) -> Result<HashMap<String, String>> {
    let path = pyvenv_cfg_path(root);
    let content = fs::read_to_string(&path).at(&path)?;
    Ok(parse_pyvenv_cfg(&content))
}

pub fn parse_pyvenv_cfg(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .filter_map(|line| {
            let (key, value) = line.split_once('=')?;
            Some((key.trim().to_lowercase(), value.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_layout(root: &Path, with_artifact: bool) {
        fs::create_dir_all(bin_dir(root)).unwrap();
        fs::write(pyvenv_cfg_path(root), "home = /usr/bin\n").unwrap();
        fs::write(bin_dir(root).join("python"), "").unwrap();
        fs::write(native_activate_path(root), "").unwrap();
        if with_artifact {
            fs::write(artifact_path(root), "").unwrap();
        }
    }

    #[test]
    fn managed_requires_artifact() {
        let temp = TempDir::new().unwrap();
        write_layout(temp.path(), false);
        assert!(is_runtime_env(temp.path()));
        assert!(!is_managed(temp.path()));

        fs::write(artifact_path(temp.path()), "").unwrap();
        assert!(is_managed(temp.path()));
    }

    #[test]
    fn empty_dir_is_not_an_environment() {
        let temp = TempDir::new().unwrap();
        assert!(!is_runtime_env(temp.path()));
        assert!(!is_managed(temp.path()));
    }

    #[test]
    #[cfg(unix)]
    fn dangling_interpreter_link_still_counts() {
        let temp = TempDir::new().unwrap();
        write_layout(temp.path(), true);
        let python = bin_dir(temp.path()).join("python");
        fs::remove_file(&python).unwrap();
        std::os::unix::fs::symlink("/nonexistent/python3.99", &python).unwrap();

        assert!(is_managed(temp.path()));
    }

    #[test]
    fn build_leftovers_are_recognized() {
        let temp = TempDir::new().unwrap();
        let empty = temp.path().join("empty");
        fs::create_dir(&empty).unwrap();
        let half = temp.path().join("half");
        write_layout(&half, false);
        let user = temp.path().join("Documents");
        fs::create_dir(&user).unwrap();
        fs::write(user.join("notes.txt"), "").unwrap();

        assert!(is_build_leftover(&empty));
        assert!(is_build_leftover(&half));
        assert!(!is_build_leftover(&user));
        assert!(!is_build_leftover(&temp.path().join("missing")));
    }

    #[test]
    fn parses_pyvenv_cfg() {
        let cfg = parse_pyvenv_cfg(
            "home = /usr/bin\ninclude-system-site-packages = false\nversion = 3.11.4\nprompt = 'web'\nnot a pair\n",
        );
        assert_eq!(cfg.get("home").map(String::as_str), Some("/usr/bin"));
        assert_eq!(cfg.get("version").map(String::as_str), Some("3.11.4"));
        assert_eq!(cfg.get("prompt").map(String::as_str), Some("'web'"));
        assert_eq!(cfg.len(), 4);
    }

    #[test]
    fn paths_are_rooted() {
        let root = Path::new("/envs/web");
        assert_eq!(artifact_path(root), PathBuf::from("/envs/web/bin/veman_activate"));
        assert_eq!(history_path(root), PathBuf::from("/envs/web/.veman_history"));
        assert_eq!(metadata_path(root), PathBuf::from("/envs/web/.veman.yml"));
    }
}

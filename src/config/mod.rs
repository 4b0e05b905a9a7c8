//! Configuration loading and registry root resolution.
//!
//! # Environment variables
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `VEMAN_ENV_DIR` | Registry root override (same as `--env-dir`) |
//! | `VEMAN_PYTHON` | Interpreter used to build environments |
//! | `VEMAN_CONFIG` | Alternate config file path |
//! | `VEMAN_PROMPT_<KEY>` | Answers for prompts in non-interactive mode |

pub mod loader;
pub mod schema;

pub use loader::{
    config_path, default_registry_root, load_config, load_config_file, resolve_registry_root,
};
pub use schema::{CreateDefaults, VemanConfig};

/// Registry root override.
pub const ENV_ENV_DIR: &str = "VEMAN_ENV_DIR";

/// Interpreter override.
pub const ENV_PYTHON: &str = "VEMAN_PYTHON";

/// Config file override.
pub const ENV_CONFIG: &str = "VEMAN_CONFIG";

/// Prefix for non-interactive prompt answers.
pub const ENV_PROMPT_PREFIX: &str = "VEMAN_PROMPT_";

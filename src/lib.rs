//! veman - Virtual environment manager with per-environment shell history.
//!
//! veman keeps named Python virtual environments under one registry root,
//! activates them in the calling bash session, swaps that session's history
//! file while an environment is active, and upgrades environments in place.
//!
//! # Modules
//!
//! - [`activation`] - Activation scripts and session state
//! - [`builder`] - Materializing environments through the runtime
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading
//! - [`error`] - Error types and result aliases
//! - [`history`] - Reading per-environment shell history
//! - [`runtime`] - The interpreter, its creation primitive and installer
//! - [`shell`] - Subprocess execution, quoting and platform detection
//! - [`store`] - The environment registry
//! - [`temp`] - Temporary environments
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//! - [`upgrade`] - In-place upgrades
//!
//! # Example
//!
//! ```
//! use veman::builder::EnvironmentBuilder;
//! use veman::runtime::MockRuntime;
//! use veman::store::{CreateOptions, EnvironmentName, EnvironmentStore};
//!
//! let root = std::env::temp_dir().join(format!("veman-lib-doc-{}", std::process::id()));
//! let store = EnvironmentStore::new(&root);
//! let runtime = MockRuntime::new();
//! let builder = EnvironmentBuilder::new(&runtime, vec!["pip".to_string()]);
//!
//! let name = EnvironmentName::parse("science").unwrap();
//! let env = store.create(&name, &CreateOptions::default(), false, &builder).unwrap();
//! assert!(env.artifact_file().exists());
//! assert_eq!(store.list().unwrap().len(), 1);
//! std::fs::remove_dir_all(&root).unwrap();
//! ```

pub mod activation;
pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod runtime;
pub mod shell;
pub mod store;
pub mod temp;
pub mod ui;
pub mod upgrade;

pub use error::{Result, VemanError};

//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::ENV_ENV_DIR;

/// veman - Virtual environment manager with per-environment shell history.
#[derive(Debug, Parser)]
#[command(name = "veman")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Registry root holding the environments (default ~/.veman/env)
    #[arg(long, global = true, env = ENV_ENV_DIR, value_name = "DIR")]
    pub env_dir: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Print system context (OS, shell, registry root, interpreter) and exit
    #[arg(long)]
    pub context: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new environment
    Create(CreateArgs),

    /// Print the script that activates an environment
    Activate(ActivateArgs),

    /// Delete an environment
    Delete(DeleteArgs),

    /// List environments
    List,

    /// Show an environment's shell history
    History(HistoryArgs),

    /// Create and activate a temporary environment, deleted on deactivation
    Temp(TempArgs),

    /// Upgrade environments in place
    Upgrade(UpgradeArgs),

    /// Print the bash integration (add `eval "$(command veman init)"` to ~/.bashrc)
    Init,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Creation flags shared by `create` and `temp`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct BuildFlags {
    /// Give the environment access to the system site-packages
    #[arg(long)]
    pub system_site_packages: bool,

    /// Do not install pip into the environment
    #[arg(long)]
    pub without_pip: bool,
}

/// Arguments for the `create` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CreateArgs {
    /// Environment name (prompted for when omitted)
    pub name: Option<String>,

    /// Activate the environment after creating it
    #[arg(short, long)]
    pub activate: bool,

    /// Replace an existing environment with the same name
    #[arg(long)]
    pub overwrite: bool,

    /// Prompt prefix shown while active (default: the name)
    #[arg(long, value_name = "PROMPT")]
    pub prompt: Option<String>,

    #[command(flatten)]
    pub flags: BuildFlags,
}

/// Arguments for the `activate` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ActivateArgs {
    /// Environment name (selected interactively when omitted)
    pub name: Option<String>,
}

/// Arguments for the `delete` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DeleteArgs {
    /// Environment name (selected interactively when omitted)
    pub name: Option<String>,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `history` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct HistoryArgs {
    /// Environment name (selected interactively when omitted)
    pub name: Option<String>,

    /// Show the history of every environment
    #[arg(short, long, conflicts_with = "name")]
    pub all: bool,

    /// Prefix each line with its environment
    #[arg(short, long)]
    pub verbose: bool,
}

/// Arguments for the `temp` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct TempArgs {
    #[command(flatten)]
    pub flags: BuildFlags,
}

/// Arguments for the `upgrade` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct UpgradeArgs {
    /// Environment name (selected interactively when omitted)
    pub name: Option<String>,

    /// Upgrade every environment
    #[arg(short, long, conflicts_with = "name")]
    pub all: bool,

    /// Upgrade pip and setuptools inside the environment
    #[arg(long)]
    pub deps: bool,

    /// Relink the environment to the current interpreter
    #[arg(long)]
    pub python: bool,

    /// Regenerate the activation script
    #[arg(long)]
    pub scripts: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_create_flags() {
        let cli = Cli::parse_from([
            "veman",
            "create",
            "web",
            "-a",
            "--overwrite",
            "--prompt",
            "api",
            "--system-site-packages",
            "--without-pip",
        ]);
        match cli.command {
            Some(Commands::Create(args)) => {
                assert_eq!(args.name.as_deref(), Some("web"));
                assert!(args.activate);
                assert!(args.overwrite);
                assert_eq!(args.prompt.as_deref(), Some("api"));
                assert!(args.flags.system_site_packages);
                assert!(args.flags.without_pip);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn parses_history_flags() {
        let cli = Cli::parse_from(["veman", "history", "-a", "-v"]);
        match cli.command {
            Some(Commands::History(args)) => {
                assert!(args.all);
                assert!(args.verbose);
                assert!(args.name.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn parses_upgrade_components() {
        let cli = Cli::parse_from(["veman", "upgrade", "web", "--deps", "--scripts"]);
        match cli.command {
            Some(Commands::Upgrade(args)) => {
                assert!(args.deps && args.scripts && !args.python);
                assert!(!args.all);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn upgrade_all_conflicts_with_name() {
        assert!(Cli::try_parse_from(["veman", "upgrade", "web", "--all"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["veman", "list", "--env-dir", "/tmp/envs", "-q"]);
        assert_eq!(cli.env_dir, Some(PathBuf::from("/tmp/envs")));
        assert!(cli.quiet);
    }

    #[test]
    fn context_without_subcommand() {
        let cli = Cli::parse_from(["veman", "--context"]);
        assert!(cli.context);
        assert!(cli.command.is_none());
    }
}

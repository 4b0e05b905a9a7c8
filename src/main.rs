//! veman CLI entry point.
//!
//! Standard output carries only data and scripts meant for `eval`; every
//! message, prompt and log line goes to standard error.

use std::process::ExitCode;

use clap::Parser;
use console::Term;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use veman::cli::{Cli, CommandDispatcher, Commands, Context};
use veman::shell::{detect_shell, is_ci, supported_os};
use veman::ui::{create_ui, OutputMode, UserInterface};
use veman::VemanError;

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("veman=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("veman=warn"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn report_error(ui: &mut dyn UserInterface, err: &VemanError) {
    ui.error(&format!("Error: {}", err));
    if let VemanError::SubprocessFailure {
        command, output, ..
    } = err
    {
        if err.diagnostic_output().is_some() {
            ui.show_error_block(command, output, None);
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("veman starting with args: {:?}", cli);

    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else if cli.debug {
        OutputMode::Verbose
    } else {
        OutputMode::Normal
    };
    let mut ui = create_ui(!is_ci(), output_mode, !cli.no_color);

    if supported_os().is_none() {
        report_error(
            ui.as_mut(),
            &VemanError::Unsupported(format!(
                "{} (veman runs on Linux and Mac OS)",
                std::env::consts::OS
            )),
        );
        return ExitCode::from(1);
    }

    let shell = detect_shell();
    if !shell.supports_activation() && !matches!(cli.command, Some(Commands::Completions(_))) {
        ui.warning(&format!(
            "Shell '{}' is not supported for activation; veman's scripts target bash",
            shell.name.as_str()
        ));
    }

    let context = match Context::load(cli.env_dir.as_deref()) {
        Ok(context) => context,
        Err(e) => {
            report_error(ui.as_mut(), &e);
            return ExitCode::from(1);
        }
    };
    let dispatcher = CommandDispatcher::new(context);

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => {
            if let Some(script) = &result.script {
                if Term::stdout().is_term() {
                    let rc = shell
                        .rc_file
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "your shell startup file".to_string());
                    ui.show_hint(&format!(
                        "Printed the activation script for {}; add `eval \"$(command veman init)\"` to {} so `veman` evaluates it",
                        script.environment(),
                        rc
                    ));
                }
                print!("{}", script);
            }
            ExitCode::from(result.exit_code as u8)
        }
        Err(e) => {
            report_error(ui.as_mut(), &e);
            ExitCode::from(1)
        }
    }
}

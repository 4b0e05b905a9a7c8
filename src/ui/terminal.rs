//! Interactive terminal UI.

use console::Term;
use std::io::Write;

use crate::error::Result;

use super::{
    prompt_user, should_use_colors, NonInteractiveUI, OutputMode, ProgressSpinner, Prompt,
    PromptResult, SpinnerHandle, Table, UserInterface, VemanTheme,
};

/// Interactive terminal UI implementation.
///
/// Status output and prompts use stderr; [`message`](UserInterface::message)
/// writes data to stdout.
pub struct TerminalUI {
    term: Term,
    out: Term,
    theme: VemanTheme,
    mode: OutputMode,
}

impl TerminalUI {
    pub fn new(mode: OutputMode, colors: bool) -> Self {
        let theme = if colors && should_use_colors() {
            VemanTheme::new()
        } else {
            VemanTheme::plain()
        };

        Self {
            term: Term::stderr(),
            out: Term::stdout(),
            theme,
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn message(&mut self, msg: &str) {
        writeln!(self.out, "{}", msg).ok();
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_error(msg)).ok();
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        prompt_user(prompt, &self.term)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            Box::new(ProgressSpinner::new(message, self.theme.clone()))
        } else {
            Box::new(ProgressSpinner::hidden())
        }
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_header(title)).ok();
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "  {}", self.theme.hint.apply_to(hint)).ok();
        }
    }

    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>) {
        for line in error_block(&self.theme, command, output, hint) {
            writeln!(self.term, "    {}", line).ok();
        }
    }

    fn show_table(&mut self, table: &Table) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", table.render()).ok();
        }
    }

    fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

/// Lines of a failed-command block: the command, its captured output, and
/// an optional hint underneath.
pub(crate) fn error_block(theme: &VemanTheme, command: &str, output: &str, hint: Option<&str>) -> Vec<String> {
    let rule = |label: &str, corner: &str| {
        let fill = 34usize.saturating_sub(label.chars().count());
        theme
            .border
            .apply_to(format!("{}─ {} {}", corner, label, "─".repeat(fill)))
            .to_string()
    };
    let bar = theme.border.apply_to("│").to_string();

    let mut lines = vec![
        rule("Command", "┌"),
        format!("{} {}", bar, theme.command.apply_to(command)),
    ];
    if !output.trim().is_empty() {
        lines.push(rule("Output", "├"));
        lines.extend(output.lines().map(|l| format!("{} {}", bar, l)));
    }
    lines.push(theme.border.apply_to(format!("└{}", "─".repeat(36))).to_string());
    if let Some(hint) = hint {
        lines.push(theme.hint.apply_to(format!("Hint: {}", hint)).to_string());
    }
    lines
}

/// Create the appropriate UI based on context.
///
/// The terminal UI is used only when `interactive` is requested and stderr
/// is a terminal.
pub fn create_ui(interactive: bool, mode: OutputMode, colors: bool) -> Box<dyn UserInterface> {
    if interactive && Term::stderr().is_term() {
        Box::new(TerminalUI::new(mode, colors))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}

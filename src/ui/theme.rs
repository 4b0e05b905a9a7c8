//! Visual theme and styling.

use console::Style;

/// veman's visual theme.
#[derive(Debug, Clone)]
pub struct VemanTheme {
    /// Success messages (green).
    pub success: Style,
    /// Warnings (yellow).
    pub warning: Style,
    /// Errors (red bold).
    pub error: Style,
    /// Secondary text.
    pub dim: Style,
    /// Headers (cyan bold).
    pub header: Style,
    /// Commands shown in output (dim italic).
    pub command: Style,
    /// Box-drawing borders (dim).
    pub border: Style,
    /// Contextual hints.
    pub hint: Style,
}

impl Default for VemanTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl VemanTheme {
    pub fn new() -> Self {
        Self {
            success: Style::new().for_stderr().green(),
            warning: Style::new().for_stderr().yellow(),
            error: Style::new().for_stderr().red().bold(),
            dim: Style::new().for_stderr().dim(),
            header: Style::new().for_stderr().bold().cyan(),
            command: Style::new().for_stderr().dim().italic(),
            border: Style::new().for_stderr().dim(),
            hint: Style::new().for_stderr().cyan().dim(),
        }
    }

    /// A theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            header: Style::new(),
            command: Style::new(),
            border: Style::new(),
            hint: Style::new(),
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    pub fn format_skipped(&self, msg: &str) -> String {
        format!("{}", self.dim.apply_to(format!("○ {}", msg)))
    }

    pub fn format_header(&self, title: &str) -> String {
        format!("{}", self.header.apply_to(title))
    }
}

/// Check if colors should be enabled on stderr.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    console::Term::stderr().is_term()
}

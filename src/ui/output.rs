//! Output mode and formatting helpers.

use std::time::Duration;

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Also show the subprocess commands being run.
    Verbose,
    /// Show progress and status.
    #[default]
    Normal,
    /// Show errors and data only.
    Quiet,
}

impl OutputMode {
    /// Check if this mode shows the commands being run.
    pub fn shows_commands(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Check if this mode shows progress spinners.
    pub fn shows_spinners(&self) -> bool {
        !matches!(self, Self::Quiet)
    }

    /// Check if this mode shows status messages.
    pub fn shows_status(&self) -> bool {
        !matches!(self, Self::Quiet)
    }
}

/// Format a duration for display.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_hides_status_and_spinners() {
        assert!(!OutputMode::Quiet.shows_status());
        assert!(!OutputMode::Quiet.shows_spinners());
        assert!(OutputMode::Normal.shows_status());
        assert!(!OutputMode::Normal.shows_commands());
        assert!(OutputMode::Verbose.shows_commands());
    }

    #[test]
    fn duration_formats() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(2500)), "2.5s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1.5m");
    }
}

//! Init command implementation.
//!
//! Prints the bash integration that evaluates activation output.

use crate::activation::shell_integration;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The init command implementation.
pub struct InitCommand;

impl Command for InitCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.message(shell_integration().trim_end());
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;

    #[test]
    fn prints_shell_function() {
        let mut ui = MockUI::new();
        InitCommand.execute(&mut ui).unwrap();
        assert!(ui.has_message("veman () {"));
    }
}

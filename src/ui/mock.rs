//! Mock UI implementation for testing.
//!
//! Every call is recorded as a [`UiEvent`], including how each spinner
//! finished; prompts are answered from responses set up front, falling back
//! to the prompt's default.
//!
//! # Example
//!
//! ```
//! use veman::ui::{MockUI, Prompt, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_prompt_response("name", "web");
//!
//! let answer = ui.prompt(&Prompt::input("name", "Environment name")).unwrap();
//! let mut spinner = ui.start_spinner("Creating web");
//! spinner.finish_success("Created web");
//!
//! assert_eq!(answer.as_string(), "web");
//! assert!(ui.has_success("Created web"));
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::error::{Result, VemanError};

use super::{OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, Table, UserInterface};

/// How a spinner finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerStatus {
    Success,
    Error,
    Skipped,
}

/// One recorded interaction, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Message(String),
    Success(String),
    Warning(String),
    Error(String),
    Header(String),
    Hint(String),
    Spinner(String),
    SpinnerFinished {
        status: SpinnerStatus,
        message: String,
    },
    ErrorBlock {
        command: String,
        output: String,
        hint: Option<String>,
    },
    Table(String),
    Prompt(String),
}

type EventLog = Rc<RefCell<Vec<UiEvent>>>;

/// A [`UserInterface`] that records everything and answers prompts from
/// canned responses.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    events: EventLog,
    answers: HashMap<String, String>,
    queued: HashMap<String, VecDeque<String>>,
}

macro_rules! recorded {
    ($(#[$doc:meta])* $name:ident => $variant:ident) => {
        $(#[$doc])*
        pub fn $name(&self) -> Vec<String> {
            self.events
                .borrow()
                .iter()
                .filter_map(|e| match e {
                    UiEvent::$variant(text) => Some(text.clone()),
                    _ => None,
                })
                .collect()
        }
    };
}

impl MockUI {
    pub fn new() -> Self {
        Self::with_mode(OutputMode::Normal)
    }

    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Answer every prompt with `key` using `response`.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.answers.insert(key.into(), response.into());
    }

    /// Answers consumed one per prompt with `key`, before the fixed response.
    pub fn queue_prompt_responses(&mut self, key: &str, responses: Vec<&str>) {
        self.queued
            .entry(key.into())
            .or_default()
            .extend(responses.into_iter().map(String::from));
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Every recorded interaction.
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.borrow().clone()
    }

    recorded!(messages => Message);
    recorded!(successes => Success);
    recorded!(warnings => Warning);
    recorded!(errors => Error);
    recorded!(headers => Header);
    recorded!(hints => Hint);
    recorded!(
        /// Messages spinners were started with.
        spinners => Spinner
    );
    recorded!(
        /// Rendered tables.
        tables => Table
    );
    recorded!(
        /// Keys of the prompts shown.
        prompts_shown => Prompt
    );

    /// Final status and message of every finished spinner.
    pub fn spinner_outcomes(&self) -> Vec<(SpinnerStatus, String)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                UiEvent::SpinnerFinished { status, message } => Some((*status, message.clone())),
                _ => None,
            })
            .collect()
    }

    /// Error blocks as (command, output, hint).
    pub fn error_blocks(&self) -> Vec<(String, String, Option<String>)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                UiEvent::ErrorBlock {
                    command,
                    output,
                    hint,
                } => Some((command.clone(), output.clone(), hint.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn has_message(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }

    /// Whether a success line or a successfully finished spinner contains `needle`.
    pub fn has_success(&self, needle: &str) -> bool {
        self.successes().iter().any(|m| m.contains(needle))
            || self.finished_with(SpinnerStatus::Success, needle)
    }

    pub fn has_warning(&self, needle: &str) -> bool {
        self.warnings().iter().any(|m| m.contains(needle))
    }

    /// Whether an error line or a failed spinner contains `needle`.
    pub fn has_error(&self, needle: &str) -> bool {
        self.errors().iter().any(|m| m.contains(needle))
            || self.finished_with(SpinnerStatus::Error, needle)
    }

    fn finished_with(&self, wanted: SpinnerStatus, needle: &str) -> bool {
        self.spinner_outcomes()
            .iter()
            .any(|(status, message)| *status == wanted && message.contains(needle))
    }

    fn answer(&mut self, key: &str) -> Option<String> {
        self.queued
            .get_mut(key)
            .and_then(VecDeque::pop_front)
            .or_else(|| self.answers.get(key).cloned())
    }

    fn record(&self, event: UiEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn message(&mut self, msg: &str) {
        self.record(UiEvent::Message(msg.into()));
    }

    fn success(&mut self, msg: &str) {
        self.record(UiEvent::Success(msg.into()));
    }

    fn warning(&mut self, msg: &str) {
        self.record(UiEvent::Warning(msg.into()));
    }

    fn error(&mut self, msg: &str) {
        self.record(UiEvent::Error(msg.into()));
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.record(UiEvent::Prompt(prompt.key.clone()));

        let Some(answer) = self.answer(&prompt.key).or_else(|| prompt.default.clone()) else {
            return Err(VemanError::Other(anyhow::anyhow!(
                "no mock response for '{}'",
                prompt.key
            )));
        };

        Ok(match prompt.prompt_type {
            PromptType::Confirm => PromptResult::Bool(PromptResult::String(answer).as_bool()),
            PromptType::Input | PromptType::Select { .. } => PromptResult::String(answer),
        })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.record(UiEvent::Spinner(message.into()));
        Box::new(MockSpinner {
            events: Rc::clone(&self.events),
        })
    }

    fn show_header(&mut self, title: &str) {
        self.record(UiEvent::Header(title.into()));
    }

    fn show_hint(&mut self, hint: &str) {
        self.record(UiEvent::Hint(hint.into()));
    }

    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>) {
        self.record(UiEvent::ErrorBlock {
            command: command.into(),
            output: output.into(),
            hint: hint.map(Into::into),
        });
    }

    fn show_table(&mut self, table: &Table) {
        self.record(UiEvent::Table(table.render()));
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Spinner that writes its outcome into the owning [`MockUI`]'s log.
pub struct MockSpinner {
    events: EventLog,
}

impl MockSpinner {
    fn finish(&mut self, status: SpinnerStatus, msg: &str) {
        self.events.borrow_mut().push(UiEvent::SpinnerFinished {
            status,
            message: msg.into(),
        });
    }
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Success, msg);
    }

    fn finish_error(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Error, msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Skipped, msg);
    }
}

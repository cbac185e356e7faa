//! Terminal interaction for the bulk workflow

pub mod prompt;
pub mod suite_selector;

pub use prompt::{is_yes, PromptError, Prompter, ScriptedPrompter, StdioPrompter};
pub use suite_selector::{confirm_creation, create_suite_interactively, select_suite};

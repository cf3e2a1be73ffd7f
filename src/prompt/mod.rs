//! Interactive Prompts
//!
//! Actions collect follow-up input through the [`Prompter`] trait: one free
//! text question or one pick from a list. [`TerminalPrompter`] backs it with
//! `dialoguer`; tests script their answers instead.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};

use crate::error::{Result, TrackerError};

/// Source of interactive answers
pub trait Prompter {
    /// Ask one free-text question. Empty answers are allowed.
    fn input(&mut self, prompt: &str) -> Result<String>;

    /// Ask the user to pick one of `items`, returning its index
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize>;
}

/// `dialoguer`-backed prompter reading from the controlling terminal
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    #[must_use]
    pub fn new() -> Self {
        Self { theme: ColorfulTheme::default() }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn input(&mut self, prompt: &str) -> Result<String> {
        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }

    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize> {
        if items.is_empty() {
            return Err(TrackerError::invalid_input(format!("Nothing to choose for '{prompt}'")));
        }

        let index = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()?;
        Ok(index)
    }
}

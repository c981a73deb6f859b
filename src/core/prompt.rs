//! Prompt module - Interactive questions

use anyhow::{Context, Result};
use dialoguer::{Input, Select, theme::ColorfulTheme};

/// Asks the user questions.
///
/// The terminal implementation is [`DialoguerPrompter`]; tests answer from
/// a script instead.
pub trait Prompter {
    /// Free-text answer. An empty answer falls back to `default` when one is given.
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String>;

    /// Index of the chosen item
    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize>;
}

/// Terminal prompts via `dialoguer`
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        input
            .interact_text()
            .context(format!("Prompt failed: {prompt}"))
    }

    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize> {
        Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()
            .context(format!("Prompt failed: {prompt}"))
    }
}

/// Ask a yes/no question as a two-item choice
pub fn yes_no(prompter: &dyn Prompter, prompt: &str, default_yes: bool) -> Result<bool> {
    let default = if default_yes { 0 } else { 1 };
    Ok(prompter.select(prompt, &["yes", "no"], default)? == 0)
}

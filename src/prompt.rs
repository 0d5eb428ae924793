use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

/// Interactive questions asked by the commands.
pub trait Prompter {
    /// Free text, falling back to `default` on an empty answer when given.
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String>;
    /// Pick one of `items`; returns its index.
    fn select(&self, prompt: &str, items: &[String]) -> Result<usize>;
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// [`Prompter`] reading from the controlling terminal.
pub struct Terminal {
    theme: ColorfulTheme,
}

impl Terminal {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for Terminal {
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme).with_prompt(prompt);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?)
    }

    fn select(&self, prompt: &str, items: &[String]) -> Result<usize> {
        Ok(Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()?)
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }
}

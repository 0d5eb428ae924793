//! Progress reporting for long-running git steps.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Sink for step-by-step progress. Purely presentational: nothing a reporter
/// does may influence control flow.
pub trait Reporter: Send + Sync {
    fn start(&self, message: &str);
    fn succeed(&self, message: &str);
    fn fail(&self, message: &str);
    fn warn(&self, message: &str);
    /// Extra lines after a failure (error dumps, recovery hints).
    fn detail(&self, message: &str);
    fn stop(&self);
}

/// Terminal spinner. `succeed`/`fail`/`warn` end the current spinner and leave a
/// persistent status line behind.
#[derive(Default)]
pub struct Spinner {
    bar: Mutex<Option<ProgressBar>>,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }

    fn clear(&self) {
        if let Some(bar) = self.bar.lock().ok().and_then(|mut slot| slot.take()) {
            bar.finish_and_clear();
        }
    }

    fn persist(&self, symbol: colored::ColoredString, message: String) {
        self.clear();
        println!("{} {}", symbol, message);
    }
}

impl Reporter for Spinner {
    fn start(&self, message: &str) {
        self.clear();
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn succeed(&self, message: &str) {
        self.persist("✓".green().bold(), message.green().to_string());
    }

    fn fail(&self, message: &str) {
        self.persist("✗".red().bold(), message.red().to_string());
    }

    fn warn(&self, message: &str) {
        self.persist("!".yellow().bold(), message.yellow().to_string());
    }

    fn detail(&self, message: &str) {
        self.clear();
        eprintln!("  {}", message.dimmed());
    }

    fn stop(&self) {
        self.clear();
    }
}

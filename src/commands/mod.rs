pub mod analyze;
pub mod config;
pub mod deps;
pub mod install;
pub mod prune;

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner on stderr for steps that wait on the registry
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());
    spinner
}

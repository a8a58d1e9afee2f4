//! Status message functions for terminal output.

use super::colors_enabled;
use owo_colors::OwoColorize;

/// Print a success message to stderr.
pub fn success(message: &str) {
    eprintln!("{}", success_line(message, colors_enabled()));
}

/// Print a warning message to stderr.
///
/// ```no_run
/// use kiln_cli::ui::warning;
///
/// warning("Skipping esm pass: every entry is a preset");
/// ```
pub fn warning(message: &str) {
    eprintln!("{}", warning_line(message, colors_enabled()));
}

fn success_line(message: &str, colors: bool) -> String {
    if colors {
        format!("{} {}", "✓".green().bold(), message)
    } else {
        format!("✓ {message}")
    }
}

fn warning_line(message: &str, colors: bool) -> String {
    if colors {
        format!("{} {}", "⚠".yellow().bold(), message.yellow())
    } else {
        format!("⚠ {message}")
    }
}

//! Terminal UI: status messages, spinner and duration formatting.
//!
//! All output goes to stderr. Colors follow `--no-color`, `NO_COLOR` and
//! `FORCE_COLOR`, then terminal detection.
//!
//! ```no_run
//! use kiln_cli::ui;
//!
//! ui::init_colors(false);
//! ui::warning("Skipping esm pass: every entry is a preset");
//! ui::success("Build completed in 1.20s");
//! ```

mod format;
mod messages;
mod spinner;

pub use format::format_duration;
pub use messages::{success, warning};
pub use spinner::Spinner;

use std::sync::atomic::{AtomicBool, Ordering};

static COLORS: AtomicBool = AtomicBool::new(true);

/// Whether `CI` holds a true-like value (`1`, `true`, `yes`, `on`).
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok_and(|value| is_truthy(&value))
}

pub(crate) fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Check if color output should be enabled.
///
/// `NO_COLOR` wins over `FORCE_COLOR`; otherwise stderr must be a terminal.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }
    console::user_attended_stderr()
}

/// Decide once whether status messages are colored.
pub fn init_colors(no_color: bool) {
    COLORS.store(!no_color && should_use_color(), Ordering::Relaxed);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}

//! Spinner shown while the compile passes run.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Spinner for work of unknown duration.
///
/// Hidden (draws nothing) when stderr is not a terminal, so CI logs and
/// piped output stay clean.
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let target = if console::user_attended_stderr() {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        Self::with_target(message, target)
    }

    fn with_target(message: &str, target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::with_draw_target(None, target);
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_strings(&["◐", "◓", "◑", "◒", "●"]));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// Stop and erase the spinner line.
    pub fn clear(&self) {
        self.pb.finish_and_clear();
    }
}

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner style used while a job runs.
/// - Yellow spinner with animated braille-style frames.
fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("\x1b[33m{spinner}\x1b[0m {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"])
}

/// Green check mark followed by the final message.
fn ok_style() -> ProgressStyle {
    ProgressStyle::with_template("\x1b[32m✔\x1b[0m {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Red cross followed by the error message.
fn err_style() -> ProgressStyle {
    ProgressStyle::with_template("\x1b[31m✘\x1b[0m {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// One spinner line per sync job.
pub struct JobLine {
    pb: ProgressBar,
    display: String,
}

impl JobLine {
    pub fn start(mp: &MultiProgress, display: &str) -> Self {
        let pb = mp.add(ProgressBar::new_spinner());
        pb.set_style(spinner_style());
        pb.set_message(format!("syncing {display}"));
        pb.enable_steady_tick(Duration::from_millis(80));
        Self {
            pb,
            display: display.to_string(),
        }
    }

    pub fn succeed(&self) {
        self.pb.set_style(ok_style());
        self.pb.finish_with_message(format!("synced {}", self.display));
    }

    pub fn fail(&self, err: &dyn std::fmt::Display) {
        self.pb.set_style(err_style());
        self.pb
            .finish_with_message(format!("syncing {} (error: {})", self.display, err));
    }
}

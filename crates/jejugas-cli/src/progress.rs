use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Create a progress bar for determinate progress
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::with_template(
        "{msg}\n[{bar:40.cyan/blue}] {pos}/{len} ({percent}%) ETA: {eta}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█▓▒░ ");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Finish a progress bar with success message
pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {}", message));
}

/// Row progress for ingestion; hidden in JSON mode
pub struct IngestProgress {
    bar: ProgressBar,
}

impl IngestProgress {
    pub fn new(total: usize, hidden: bool) -> Self {
        let bar = if hidden {
            ProgressBar::hidden()
        } else {
            create_progress_bar(total as u64, "Resolving station coordinates")
        };
        Self { bar }
    }

    pub fn update(&self, processed: usize, unresolved: usize) {
        self.bar.set_position(processed as u64);
        if unresolved > 0 {
            self.bar.set_message(format!("Resolving station coordinates ({} unresolved)", unresolved));
        }
    }

    pub fn finish(&self, upserted: usize) {
        finish_success(&self.bar, &format!("Processed {} stations", upserted));
    }
}

//! Shared progress bar for row generation.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Row-count progress bar, or `None` when progress output is disabled.
pub fn row_progress(enabled: bool, total_rows: u64, message: &str) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }

    let pb = ProgressBar::new(total_rows);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({percent}%) {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█▓▒░  ")
    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.to_string());
    Some(pb)
}

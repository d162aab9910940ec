//! Spinners and the scan progress bar.

use crate::error::ClientError;
use crate::search::ScanObserver;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Start a spinner with `message`. Hidden when `enabled` is false.
pub fn spinner(message: &str, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Progress bar for a multi-page scan.
#[derive(Clone)]
pub struct ScanProgress {
    bar: ProgressBar,
}

impl ScanProgress {
    pub fn new(enabled: bool) -> Self {
        let bar = if enabled {
            ProgressBar::new(0)
        } else {
            ProgressBar::hidden()
        };

        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }

        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ScanObserver for ScanProgress {
    fn scan_started(&self, total_pages: u32) {
        self.bar.set_length(u64::from(total_pages));
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    fn waiting(&self, page: u32, delay: Duration) {
        self.bar.set_message(format!(
            "(waiting {:.1}s before page {})",
            delay.as_secs_f64(),
            page
        ));
    }

    fn page_finished(&self, page: u32, matches: usize) {
        self.bar.set_position(u64::from(page));
        self.bar.set_message(format!("({} matches on page {})", matches, page));
    }

    fn page_failed(&self, page: u32, error: &ClientError) {
        self.bar.set_position(u64::from(page));
        self.bar
            .println(format!("{}", format!("Page {} failed: {}", page, error).yellow()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_progress_tracks_position() {
        let progress = ScanProgress::new(false);
        progress.scan_started(4);
        progress.page_finished(1, 2);
        progress.page_failed(2, &ClientError::Server(500));
        assert_eq!(progress.bar.length(), Some(4));
        assert_eq!(progress.bar.position(), 2);
        progress.finish();
    }
}

use std::time::Instant;
use tracing::{info, warn};

/// Per-library outcome counters with a logged summary at the end of the
/// walk.
pub struct DownloadTracker {
    downloaded: usize,
    skipped: usize,
    failed: usize,
    start_time: Instant,
}

impl DownloadTracker {
    pub fn new() -> Self {
        Self {
            downloaded: 0,
            skipped: 0,
            failed: 0,
            start_time: Instant::now(),
        }
    }

    /// A poster landed on disk.
    pub fn record_downloaded(&mut self) {
        self.downloaded += 1;
    }

    /// The item carries no poster.
    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Fetching or writing one poster failed; the walk continues.
    pub fn record_failed(&mut self) {
        self.failed += 1;
    }

    pub fn downloaded(&self) -> usize {
        self.downloaded
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Log the library's outcome. WARN when anything failed, so summary-level
    /// scanning of the log catches problems.
    pub fn log_summary(&self, library: &str) {
        let elapsed = self.start_time.elapsed();
        if self.failed > 0 {
            warn!(
                "{}: {} posters in {:.1}s | Downloaded: {} | No poster: {} | Failed: {}",
                library,
                self.downloaded + self.skipped + self.failed,
                elapsed.as_secs_f64(),
                self.downloaded,
                self.skipped,
                self.failed
            );
        } else {
            info!(
                "{}: {} posters in {:.1}s | Downloaded: {} | No poster: {}",
                library,
                self.downloaded + self.skipped,
                elapsed.as_secs_f64(),
                self.downloaded,
                self.skipped
            );
        }
    }
}

impl Default for DownloadTracker {
    fn default() -> Self {
        Self::new()
    }
}

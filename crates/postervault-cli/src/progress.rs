use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::io::IsTerminal;

/// Progress bars for the download walk, one per library.
pub struct DownloadUi {
    multi: MultiProgress,
    interactive: bool,
}

impl DownloadUi {
    pub fn new() -> Self {
        let interactive = is_interactive();
        if !interactive {
            tracing::info!(
                "Running in non-interactive mode - progress bars disabled, using log output"
            );
        }
        Self {
            multi: MultiProgress::new(),
            interactive,
        }
    }

    /// Bar for one library. Hidden when no terminal is attached; progress
    /// then comes from the log stream instead.
    pub fn library_bar(&self, name: &str) -> ProgressBar {
        if !self.interactive {
            return ProgressBar::hidden();
        }

        let bar = self.multi.add(ProgressBar::new(0));
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        bar.set_message(name.to_string());
        bar
    }
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}

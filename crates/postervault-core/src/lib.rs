pub mod download;
pub mod naming;
pub mod save_path;
pub mod tracker;

pub use download::{download_library_posters, DownloadError, LibraryKind, LibrarySummary};
pub use naming::{display_name, sanitize_title};
pub use save_path::unique_save_path;
pub use tracker::DownloadTracker;

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use postervault_plex::{LibraryInfo, MediaItem, PlexConnection, PlexError};

use crate::naming::{display_name, sanitize_title};
use crate::save_path::unique_save_path;
use crate::tracker::DownloadTracker;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Plex(#[from] PlexError),

    #[error("Failed to write poster to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryKind {
    Video,
    Audio,
    Photo,
    Unknown,
}

impl LibraryKind {
    pub fn classify(section_type: &str) -> Self {
        match section_type {
            "movie" | "show" => Self::Video,
            "artist" => Self::Audio,
            "photo" => Self::Photo,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug)]
pub struct LibrarySummary {
    pub library: String,
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Directory posters were written into, when anything was written.
    pub save_dir: Option<PathBuf>,
}

impl LibrarySummary {
    fn empty(library: &str) -> Self {
        Self {
            library: library.to_string(),
            downloaded: 0,
            skipped: 0,
            failed: 0,
            save_dir: None,
        }
    }

    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.failed
    }
}

/// Walk one library and save a poster per media node.
///
/// Video libraries take the poster of each item directly; audio libraries
/// descend one level (artist to album) first. `on_item` fires once per
/// TOP-LEVEL item, so progress over an artist counts once no matter how
/// many albums it carries.
///
/// Listing failures abort the walk; fetching or writing a single poster
/// does not - those are counted and logged.
pub async fn download_library_posters(
    conn: &PlexConnection,
    section: &LibraryInfo,
    save_root: &Path,
    mut on_item: impl FnMut(usize, usize),
) -> Result<LibrarySummary, DownloadError> {
    let kind = LibraryKind::classify(&section.type_);
    match kind {
        LibraryKind::Photo => {
            info!(
                "Poster download does not handle photo libraries, skipping \"{}\"",
                section.title
            );
            return Ok(LibrarySummary::empty(&section.title));
        }
        LibraryKind::Unknown => {
            info!(
                "Unknown library type \"{}\", skipping \"{}\"",
                section.type_, section.title
            );
            return Ok(LibrarySummary::empty(&section.title));
        }
        LibraryKind::Video | LibraryKind::Audio => {}
    }

    let items = conn.library_items(section).await?;
    let total = items.len();
    debug!("\"{}\": {} {} items", section.title, total, section.type_);

    let mut tracker = DownloadTracker::new();
    let mut save_dir = None;

    for (idx, item) in items.iter().enumerate() {
        if kind == LibraryKind::Audio {
            // Album art lives on albums, not artists.
            match conn.children(item).await {
                Ok(albums) => {
                    for album in &albums {
                        let name = sanitize_title(&album.title);
                        save_poster(
                            conn,
                            &section.title,
                            album,
                            &name,
                            save_root,
                            &mut tracker,
                            &mut save_dir,
                        )
                        .await;
                    }
                }
                Err(err) => {
                    warn!("Failed to list albums for \"{}\": {}", item.title, err);
                    tracker.record_failed();
                }
            }
        } else {
            let name = display_name(&item.title, item.year);
            save_poster(
                conn,
                &section.title,
                item,
                &name,
                save_root,
                &mut tracker,
                &mut save_dir,
            )
            .await;
        }
        on_item(idx + 1, total);
    }

    tracker.log_summary(&section.title);
    Ok(LibrarySummary {
        library: section.title.clone(),
        downloaded: tracker.downloaded(),
        skipped: tracker.skipped(),
        failed: tracker.failed(),
        save_dir,
    })
}

async fn save_poster(
    conn: &PlexConnection,
    library: &str,
    item: &MediaItem,
    name: &str,
    save_root: &Path,
    tracker: &mut DownloadTracker,
    save_dir: &mut Option<PathBuf>,
) {
    let Some(thumb) = item.thumb.as_deref() else {
        debug!("No poster available for \"{}\"", item.title);
        tracker.record_skipped();
        return;
    };

    let path = match unique_save_path(save_root, library, name) {
        Ok(path) => path,
        Err(err) => {
            warn!("Could not prepare save path for \"{}\": {}", name, err);
            tracker.record_failed();
            return;
        }
    };

    let url = conn.poster_url(thumb);
    match fetch_to_file(conn, &url, &path).await {
        Ok(()) => {
            debug!("Saved poster for \"{}\" to {}", item.title, path.display());
            tracker.record_downloaded();
            *save_dir = path.parent().map(Path::to_path_buf);
        }
        Err(err) => {
            warn!("Failed to download poster for \"{}\": {}", name, err);
            tracker.record_failed();
        }
    }
}

async fn fetch_to_file(
    conn: &PlexConnection,
    url: &str,
    path: &Path,
) -> Result<(), DownloadError> {
    let mut response = conn.fetch(url).await?;

    let mut file =
        tokio::fs::File::create(path)
            .await
            .map_err(|source| DownloadError::Write {
                path: path.to_path_buf(),
                source,
            })?;

    while let Some(chunk) = response.chunk().await.map_err(|source| PlexError::Read {
        url: url.to_string(),
        source,
    })? {
        file.write_all(&chunk)
            .await
            .map_err(|source| DownloadError::Write {
                path: path.to_path_buf(),
                source,
            })?;
    }

    file.flush().await.map_err(|source| DownloadError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

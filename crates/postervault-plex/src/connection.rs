use postervault_config::PlexSettings;
use tracing::{debug, info, warn};

use crate::api::{LibraryInfo, MediaItem, PlexHttpClient};
use crate::error::PlexError;

/// An established connection: the resolved server address plus the section
/// list fetched at connect time. Poster URLs are built from the resolved
/// address, never re-read from the environment.
#[derive(Debug)]
pub struct PlexConnection {
    http: PlexHttpClient,
    base_url: String,
    sections: Vec<LibraryInfo>,
}

impl PlexConnection {
    /// Connect to the server described by `settings`.
    ///
    /// A transport failure on the primary address gets exactly one shot at
    /// the public address; authorization and API failures do not fall back,
    /// so a bad token is never masked by a second attempt.
    pub async fn connect(settings: &PlexSettings) -> Result<Self, PlexError> {
        let http = PlexHttpClient::new(&settings.token)?;

        let primary = settings.server_url.as_str();
        let (resolved, name) = match http.server_info(primary).await {
            Ok(name) => (primary, name),
            Err(PlexError::Connect { url, source }) => {
                let Some(public) = settings.public_url.as_deref() else {
                    return Err(PlexError::Connect { url, source });
                };
                warn!(
                    "Plex server at {} is unreachable ({}), falling back to {}",
                    url, source, public
                );
                (public, http.server_info(public).await?)
            }
            Err(other) => return Err(other),
        };
        info!(
            "Connected to Plex server \"{}\" at {}",
            name.as_deref().unwrap_or("unknown"),
            resolved
        );

        let sections = http.get_libraries(resolved).await?;
        debug!(
            "Server reports sections: {}",
            sections
                .iter()
                .map(|s| s.title.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self {
            http,
            base_url: resolved.to_string(),
            sections,
        })
    }

    /// The address the connection was actually established against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn sections(&self) -> &[LibraryInfo] {
        &self.sections
    }

    /// Look up a configured library by name.
    pub fn section(&self, name: &str) -> Result<&LibraryInfo, PlexError> {
        self.sections
            .iter()
            .find(|s| s.title == name)
            .ok_or_else(|| PlexError::LibraryNotFound(name.to_string()))
    }

    pub async fn library_items(&self, section: &LibraryInfo) -> Result<Vec<MediaItem>, PlexError> {
        self.http.get_library_items(&self.base_url, &section.key).await
    }

    pub async fn children(&self, item: &MediaItem) -> Result<Vec<MediaItem>, PlexError> {
        self.http.get_children(&self.base_url, &item.rating_key).await
    }

    /// Absolute poster URL for a server-relative thumb path, with the token
    /// carried as a query parameter.
    pub fn poster_url(&self, thumb: &str) -> String {
        format!(
            "{}{}?X-Plex-Token={}",
            self.base_url,
            thumb,
            urlencoding::encode(self.http.token())
        )
    }

    pub async fn fetch(&self, url: &str) -> Result<reqwest::Response, PlexError> {
        self.http.fetch(url).await
    }
}

use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::PlexError;

const CLIENT_IDENTIFIER: &str = "postervault";

#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub key: String,
    pub type_: String,
    pub title: String,
}

/// One media node: a movie, a show, an artist, or an album.
#[derive(Debug, Clone)]
pub struct MediaItem {
    pub rating_key: String,
    pub title: String,
    pub year: Option<u32>,
    /// Server-relative poster path, e.g. `/library/metadata/42/thumb/17`.
    pub thumb: Option<String>,
    /// Aggregated identifier string: every external id as `{source-ID}`
    /// plus the Plex-internal `plex://TYPE/ID` token.
    pub guid: String,
    pub type_: String,
    pub added_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct PlexHttpClient {
    client: Client,
    token: String,
}

impl PlexHttpClient {
    pub fn new(token: &str) -> Result<Self, PlexError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            reqwest::header::HeaderName::from_static("x-plex-token"),
            reqwest::header::HeaderValue::from_str(token).map_err(|_| PlexError::InvalidToken)?,
        );
        headers.insert(
            reqwest::header::HeaderName::from_static("x-plex-client-identifier"),
            reqwest::header::HeaderValue::from_static(CLIENT_IDENTIFIER),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(PlexError::ClientBuild)?;

        Ok(Self {
            client,
            token: token.to_string(),
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    async fn get_json(&self, url: &str) -> Result<Value, PlexError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| PlexError::Connect {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(PlexError::Unauthorized);
        }
        if !status.is_success() {
            return Err(PlexError::Api {
                url: url.to_string(),
                status,
            });
        }

        response.json().await.map_err(|source| PlexError::Parse {
            url: url.to_string(),
            source,
        })
    }

    /// Probe the server root. Confirms the address is reachable and the
    /// token is accepted; returns the server's friendly name when present.
    pub async fn server_info(&self, base_url: &str) -> Result<Option<String>, PlexError> {
        let url = format!("{}/", base_url);
        let json = self.get_json(&url).await?;
        Ok(json
            .get("MediaContainer")
            .and_then(|mc| mc.get("friendlyName"))
            .and_then(|n| n.as_str())
            .map(str::to_string))
    }

    pub async fn get_libraries(&self, base_url: &str) -> Result<Vec<LibraryInfo>, PlexError> {
        let url = format!("{}/library/sections", base_url);
        let json = self.get_json(&url).await?;

        let mut libraries = Vec::new();
        if let Some(directories) = json
            .get("MediaContainer")
            .and_then(|mc| mc.get("Directory"))
            .and_then(|d| d.as_array())
        {
            for dir in directories {
                libraries.push(LibraryInfo {
                    key: string_field(dir, "key"),
                    type_: string_field(dir, "type"),
                    title: string_field(dir, "title"),
                });
            }
        }

        debug!("Found {} libraries on server", libraries.len());
        Ok(libraries)
    }

    /// All top-level items of a library section (movies, shows, or artists).
    pub async fn get_library_items(
        &self,
        base_url: &str,
        library_key: &str,
    ) -> Result<Vec<MediaItem>, PlexError> {
        let url = format!(
            "{}/library/sections/{}/all?includeGuids=1",
            base_url, library_key
        );
        self.get_metadata_items(&url).await
    }

    /// Children of a media node. Used to descend from an artist to its
    /// albums, which is where music poster art lives.
    pub async fn get_children(
        &self,
        base_url: &str,
        rating_key: &str,
    ) -> Result<Vec<MediaItem>, PlexError> {
        let url = format!("{}/library/metadata/{}/children", base_url, rating_key);
        self.get_metadata_items(&url).await
    }

    async fn get_metadata_items(&self, url: &str) -> Result<Vec<MediaItem>, PlexError> {
        let json = self.get_json(url).await?;

        let mut items = Vec::new();
        if let Some(metadata) = json
            .get("MediaContainer")
            .and_then(|mc| mc.get("Metadata"))
            .and_then(|m| m.as_array())
        {
            let mut skipped = 0;
            for entry in metadata {
                if let Some(item) = parse_media_item(entry) {
                    items.push(item);
                } else {
                    skipped += 1;
                }
            }
            if skipped > 0 {
                debug!("Skipped {} items that couldn't be parsed from {}", skipped, url);
            }
        }

        Ok(items)
    }

    /// GET an absolute URL (a poster) and hand back the response for
    /// chunk-wise reading. Status is checked here so callers only see
    /// readable bodies.
    pub async fn fetch(&self, url: &str) -> Result<reqwest::Response, PlexError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| PlexError::Connect {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(PlexError::Unauthorized);
        }
        if !status.is_success() {
            return Err(PlexError::Api {
                url: url.to_string(),
                status,
            });
        }
        Ok(response)
    }
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

fn parse_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    value
        .and_then(|t| t.as_i64())
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
}

fn parse_media_item(entry: &Value) -> Option<MediaItem> {
    let rating_key = entry.get("ratingKey")?.as_str()?.to_string();
    let title = entry.get("title")?.as_str()?.to_string();
    let year = entry.get("year").and_then(|y| y.as_u64()).map(|y| y as u32);
    let thumb = entry
        .get("thumb")
        .and_then(|t| t.as_str())
        .map(str::to_string);
    let type_ = string_field(entry, "type");
    let added_at = parse_timestamp(entry.get("addedAt"));

    let guid_ids: Vec<String> = entry
        .get("Guid")
        .and_then(|g| g.as_array())
        .map(|guids| {
            guids
                .iter()
                .filter_map(|g| g.get("id").and_then(|id| id.as_str()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let primary_guid = entry.get("guid").and_then(|g| g.as_str());
    let guid = aggregate_identifier(primary_guid, &guid_ids);

    Some(MediaItem {
        rating_key,
        title,
        year,
        thumb,
        guid,
        type_,
        added_at,
    })
}

/// Collapse an item's guid fields into one identifier string.
///
/// External ids arrive as `source://ID` entries in the `Guid` array and
/// become `{source-ID}` tokens; the Plex-internal id (`plex://TYPE/ID`,
/// usually the top-level `guid`) is kept verbatim.
fn aggregate_identifier(primary: Option<&str>, guid_ids: &[String]) -> String {
    let mut parts = Vec::new();
    let mut has_plex = false;

    for id in guid_ids {
        match id.split_once("://") {
            Some(("plex", _)) => {
                parts.push(id.clone());
                has_plex = true;
            }
            Some((source, value)) if !value.is_empty() => {
                parts.push(format!("{{{source}-{value}}}"));
            }
            _ => debug!("Ignoring malformed guid entry \"{}\"", id),
        }
    }

    if let Some(primary) = primary {
        if primary.starts_with("plex://") && !has_plex {
            parts.push(primary.to_string());
        }
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_media_item_full() {
        let entry = json!({
            "ratingKey": "42",
            "title": "Fight Club",
            "year": 1999,
            "thumb": "/library/metadata/42/thumb/17",
            "type": "movie",
            "addedAt": 1580000000,
            "guid": "plex://movie/5d7768265c8abc001f65bc09",
            "Guid": [
                {"id": "imdb://tt0137523"},
                {"id": "tmdb://550"}
            ]
        });

        let item = parse_media_item(&entry).unwrap();
        assert_eq!(item.rating_key, "42");
        assert_eq!(item.title, "Fight Club");
        assert_eq!(item.year, Some(1999));
        assert_eq!(item.thumb.as_deref(), Some("/library/metadata/42/thumb/17"));
        assert_eq!(item.type_, "movie");
        assert!(item.added_at.is_some());
        assert_eq!(
            item.guid,
            "{imdb-tt0137523} {tmdb-550} plex://movie/5d7768265c8abc001f65bc09"
        );
    }

    #[test]
    fn test_parse_media_item_minimal() {
        let entry = json!({"ratingKey": "7", "title": "Untitled"});
        let item = parse_media_item(&entry).unwrap();
        assert_eq!(item.year, None);
        assert_eq!(item.thumb, None);
        assert_eq!(item.guid, "");
    }

    #[test]
    fn test_parse_media_item_requires_title_and_key() {
        assert!(parse_media_item(&json!({"title": "No key"})).is_none());
        assert!(parse_media_item(&json!({"ratingKey": "9"})).is_none());
    }

    #[test]
    fn test_aggregate_identifier_plex_in_guid_array() {
        let ids = vec!["plex://show/abc123".to_string(), "tvdb://121361".to_string()];
        let guid = aggregate_identifier(Some("plex://show/abc123"), &ids);
        // The top-level guid must not be duplicated.
        assert_eq!(guid, "plex://show/abc123 {tvdb-121361}");
    }

    #[test]
    fn test_aggregate_identifier_legacy_agent_guid() {
        // Old-style agent guids are not plex:// tokens and stay out of the
        // identifier string.
        let guid = aggregate_identifier(Some("com.plexapp.agents.imdb://tt0137523?lang=en"), &[]);
        assert_eq!(guid, "");
    }
}

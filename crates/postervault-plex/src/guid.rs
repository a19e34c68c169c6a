use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuidError {
    #[error("Unsupported item kind \"{0}\": expected \"movie\" or \"show\"")]
    UnsupportedKind(String),
}

/// Returned when no recognized source token is present in the identifier.
pub const NO_GUID: &str = "-1";

const MOVIE_SOURCES: &[&str] = &["tmdb", "imdb", "plex"];
const SHOW_SOURCES: &[&str] = &["tvdb", "tmdb", "plex"];

/// Pick the best external identifier out of an item's aggregated identifier
/// string.
///
/// Sources are searched in a kind-specific priority order (movies prefer
/// TMDb, shows prefer TVDB, both fall back to the Plex-internal id).
/// Non-Plex tokens are delimited `{source-ID}`; the Plex token is
/// `plex://TYPE/ID`. With `full` the result carries its `source://` prefix.
/// Returns [`NO_GUID`] when nothing matches.
pub fn extract_guid(identifier: &str, kind: &str, full: bool) -> Result<String, GuidError> {
    let sources = match kind {
        "movie" => MOVIE_SOURCES,
        "show" => SHOW_SOURCES,
        other => return Err(GuidError::UnsupportedKind(other.to_string())),
    };

    for source in sources {
        let value = if *source == "plex" {
            plex_token(identifier)
        } else {
            braced_token(identifier, source)
        };
        if let Some(value) = value {
            if full {
                return Ok(format!("{source}://{value}"));
            }
            return Ok(value);
        }
    }

    Ok(NO_GUID.to_string())
}

/// `{source-ID}` → `ID`
fn braced_token(identifier: &str, source: &str) -> Option<String> {
    let marker = format!("{{{source}-");
    let rest = &identifier[identifier.find(&marker)? + marker.len()..];
    let end = rest.find('}')?;
    Some(rest[..end].to_string())
}

/// `plex://TYPE/ID` → `TYPE/ID`
fn plex_token(identifier: &str) -> Option<String> {
    let rest = &identifier[identifier.find("plex://")? + "plex://".len()..];
    rest.split_whitespace().next().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_tmdb_short_and_full() {
        let id = "{tmdb-123}";
        assert_eq!(extract_guid(id, "movie", false).unwrap(), "123");
        assert_eq!(extract_guid(id, "movie", true).unwrap(), "tmdb://123");
    }

    #[test]
    fn test_movie_prefers_tmdb_over_imdb() {
        let id = "{imdb-tt0137523} {tmdb-550} plex://movie/5d7768265c8abc001f65bc09";
        assert_eq!(extract_guid(id, "movie", false).unwrap(), "550");
        assert_eq!(extract_guid(id, "movie", true).unwrap(), "tmdb://550");
    }

    #[test]
    fn test_movie_falls_back_to_imdb() {
        let id = "{imdb-tt0137523} plex://movie/5d7768265c8abc001f65bc09";
        assert_eq!(extract_guid(id, "movie", false).unwrap(), "tt0137523");
    }

    #[test]
    fn test_show_prefers_tvdb_over_tmdb() {
        let id = "{tmdb-1399} {tvdb-121361}";
        assert_eq!(extract_guid(id, "show", false).unwrap(), "121361");
        assert_eq!(extract_guid(id, "show", true).unwrap(), "tvdb://121361");
    }

    #[test]
    fn test_plex_only_identifier() {
        let id = "plex://movie/456";
        assert_eq!(extract_guid(id, "movie", false).unwrap(), "movie/456");
        assert_eq!(extract_guid(id, "movie", true).unwrap(), "plex://movie/456");
    }

    #[test]
    fn test_no_recognized_source() {
        assert_eq!(
            extract_guid("local://1234", "movie", false).unwrap(),
            NO_GUID
        );
        assert_eq!(extract_guid("", "show", true).unwrap(), NO_GUID);
    }

    #[test]
    fn test_unsupported_kind_is_an_error() {
        let err = extract_guid("{tmdb-123}", "album", false).unwrap_err();
        assert!(matches!(err, GuidError::UnsupportedKind(kind) if kind == "album"));
    }

    #[test]
    fn test_movie_ignores_tvdb_token() {
        // tvdb is not in the movie priority list, so only the plex id matches.
        let id = "{tvdb-121361} plex://movie/789";
        assert_eq!(extract_guid(id, "movie", false).unwrap(), "movie/789");
    }

    #[test]
    fn test_bare_source_name_is_not_a_token() {
        // The source name appearing outside a {source-ID} token must not match.
        assert_eq!(
            extract_guid("tmdb import pending", "movie", false).unwrap(),
            NO_GUID
        );
    }
}

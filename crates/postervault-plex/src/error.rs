use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlexError {
    #[error("Invalid token format")]
    InvalidToken,

    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Unable to connect to Plex server at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid Plex token. Please check the \"PLEX_TOKEN\" in .env, and consult the README.")]
    Unauthorized,

    #[error("Plex server returned {status} for {url}")]
    Api {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to read poster bytes from {url}: {source}")]
    Read {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse Plex response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Library named \"{0}\" not found. Please check the config.yml, and consult the README.")]
    LibraryNotFound(String),
}

use thiserror::Error;

pub const TOKEN_VAR: &str = "PLEX_TOKEN";
pub const SERVER_VAR: &str = "PLEX_SERVER_IP";
pub const PUBLIC_VAR: &str = "PLEX_SERVER_PUBLIC_IP";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Cannot find \"{0}\" in the environment or .env file. Please consult the README.")]
    MissingVar(&'static str),

    #[error(
        "Cannot find a server address in the environment or .env file. \
         Set \"PLEX_SERVER_IP\" (or \"PLEX_SERVER_PUBLIC_IP\"), and consult the README."
    )]
    MissingAddress,

    #[error(
        "Invalid server address \"{0}\". Addresses must begin with \"http://\" or \"https://\". \
         Please check the server addresses in .env, and consult the README."
    )]
    InvalidAddress(String),
}

/// Connection settings, read from the environment once at startup and passed
/// explicitly to everything that needs them.
#[derive(Debug, Clone)]
pub struct PlexSettings {
    pub token: String,
    /// Primary server address (scheme included).
    pub server_url: String,
    /// Secondary/public address, tried once if the primary is unreachable.
    pub public_url: Option<String>,
    /// True when no primary address was given and the public address was
    /// promoted to primary.
    pub using_public_ip: bool,
}

impl PlexSettings {
    /// Read `PLEX_TOKEN`, `PLEX_SERVER_IP`, and `PLEX_SERVER_PUBLIC_IP`.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::resolve(
            std::env::var(TOKEN_VAR).ok(),
            std::env::var(SERVER_VAR).ok(),
            std::env::var(PUBLIC_VAR).ok(),
        )
    }

    /// Resolve settings from raw variable values.
    ///
    /// When only a public address is present, it becomes the primary and no
    /// fallback remains.
    pub fn resolve(
        token: Option<String>,
        server: Option<String>,
        public: Option<String>,
    ) -> Result<Self, SettingsError> {
        let token = token.ok_or(SettingsError::MissingVar(TOKEN_VAR))?;

        let (server_url, public_url, using_public_ip) = match (server, public) {
            (Some(server), public) => (server, public, false),
            (None, Some(public)) => (public, None, true),
            (None, None) => return Err(SettingsError::MissingAddress),
        };

        for url in std::iter::once(&server_url).chain(public_url.iter()) {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SettingsError::InvalidAddress(url.clone()));
            }
        }

        Ok(Self {
            token,
            server_url,
            public_url,
            using_public_ip,
        })
    }

    /// Name of the variable that supplied the primary address, for guidance
    /// messages when the connection fails.
    pub fn primary_var(&self) -> &'static str {
        if self.using_public_ip {
            PUBLIC_VAR
        } else {
            SERVER_VAR
        }
    }
}

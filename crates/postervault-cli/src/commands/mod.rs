pub mod download;
pub mod libraries;

use color_eyre::eyre::{eyre, Report};
use postervault_config::PlexSettings;
use postervault_plex::{PlexConnection, PlexError};

pub(crate) fn load_settings() -> Result<PlexSettings, Report> {
    PlexSettings::from_env().map_err(|err| eyre!("{err}"))
}

/// Connect, turning failures into the guidance messages the error taxonomy
/// asks for: which variable to check depends on how the addresses were
/// configured.
pub(crate) async fn establish_connection(
    settings: &PlexSettings,
) -> Result<PlexConnection, Report> {
    PlexConnection::connect(settings)
        .await
        .map_err(|err| connection_guidance(err, settings))
}

fn connection_guidance(err: PlexError, settings: &PlexSettings) -> Report {
    match err {
        PlexError::Connect { .. } => {
            if settings.public_url.is_some() {
                eyre!(
                    "Unable to connect to Plex server. Please check the server \
                     addresses in .env, and consult the README."
                )
            } else {
                eyre!(
                    "Unable to connect to Plex server. Please check the \"{}\" \
                     in .env, and consult the README.",
                    settings.primary_var()
                )
            }
        }
        other => eyre!("{other}"),
    }
}

pub mod libraries;
pub mod settings;

pub use libraries::{
    CollectionLoadError, CollectionsOutcome, ConfigFileError, LibrariesConfig, LibraryEntry,
};
pub use settings::{PlexSettings, SettingsError};

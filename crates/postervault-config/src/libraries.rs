use serde_yaml::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{path}: {message}")]
    Invalid { path: PathBuf, message: String },
}

/// One configured library: its name and the collection config files attached
/// to it.
#[derive(Debug, Clone)]
pub struct LibraryEntry {
    pub name: String,
    pub collection_files: Vec<PathBuf>,
}

/// The `config.yml` library list, in declaration order.
#[derive(Debug, Clone)]
pub struct LibrariesConfig {
    entries: Vec<LibraryEntry>,
}

/// A collection config file that failed to load. Collected rather than
/// printed so the caller decides how to surface partial failures.
#[derive(Debug)]
pub struct CollectionLoadError {
    pub library: String,
    pub file: PathBuf,
    pub message: String,
}

/// Result of loading collection configs: whatever parsed, plus every failure.
#[derive(Debug, Default)]
pub struct CollectionsOutcome {
    pub collections: HashMap<String, serde_yaml::Mapping>,
    pub errors: Vec<CollectionLoadError>,
}

impl LibrariesConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigFileError> {
        let root: Value =
            serde_yaml::from_str(content).map_err(|source| ConfigFileError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;

        let libraries = root
            .get("libraries")
            .and_then(Value::as_mapping)
            .ok_or_else(|| ConfigFileError::Invalid {
                path: path.to_path_buf(),
                message: "expected a top-level \"libraries\" mapping".to_string(),
            })?;

        // Walk the mapping rather than deserializing into a map type so the
        // declaration order of libraries is preserved.
        let mut entries = Vec::new();
        for (key, value) in libraries {
            let name = key
                .as_str()
                .ok_or_else(|| ConfigFileError::Invalid {
                    path: path.to_path_buf(),
                    message: "library names must be strings".to_string(),
                })?
                .to_string();

            let mut collection_files = Vec::new();
            if let Some(files) = value.get("collection_files").and_then(Value::as_sequence) {
                for file_ref in files {
                    if let Some(file) = file_ref.get("file").and_then(Value::as_str) {
                        collection_files.push(PathBuf::from(file));
                    }
                }
            }

            entries.push(LibraryEntry {
                name,
                collection_files,
            });
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[LibraryEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load every collection config file referenced by the library list.
    ///
    /// Files that fail to read or parse end up in `errors`; everything else
    /// is merged into the per-library `collections` mapping.
    pub fn load_collections(&self) -> CollectionsOutcome {
        let mut outcome = CollectionsOutcome::default();

        for entry in &self.entries {
            for file in &entry.collection_files {
                match load_collection_file(file) {
                    Ok(collections) => {
                        debug!(
                            library = %entry.name,
                            file = %file.display(),
                            count = collections.len(),
                            "Loaded collection config"
                        );
                        outcome
                            .collections
                            .entry(entry.name.clone())
                            .or_default()
                            .extend(collections);
                    }
                    Err(message) => outcome.errors.push(CollectionLoadError {
                        library: entry.name.clone(),
                        file: file.clone(),
                        message,
                    }),
                }
            }
        }

        outcome
    }
}

fn load_collection_file(path: &Path) -> Result<serde_yaml::Mapping, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let root: Value = serde_yaml::from_str(&content).map_err(|e| e.to_string())?;
    root.get("collections")
        .and_then(Value::as_mapping)
        .cloned()
        .ok_or_else(|| "expected a top-level \"collections\" mapping".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_parse_preserves_library_order() {
        let yaml = r#"
libraries:
  TV Shows:
    collection_files: []
  Movies:
    collection_files:
      - file: movies.yml
  Music: {}
"#;
        let config = LibrariesConfig::parse(yaml, Path::new("config.yml")).unwrap();
        let names: Vec<_> = config.names().collect();
        assert_eq!(names, vec!["TV Shows", "Movies", "Music"]);
        assert_eq!(
            config.entries()[1].collection_files,
            vec![PathBuf::from("movies.yml")]
        );
        assert!(config.entries()[0].collection_files.is_empty());
    }

    #[test]
    fn test_parse_rejects_missing_libraries_key() {
        let err = LibrariesConfig::parse("collections: {}", Path::new("config.yml")).unwrap_err();
        assert!(matches!(err, ConfigFileError::Invalid { .. }));
    }

    #[test]
    fn test_parse_rejects_malformed_yaml() {
        let err = LibrariesConfig::parse("libraries: [:", Path::new("config.yml")).unwrap_err();
        assert!(matches!(err, ConfigFileError::Yaml { .. }));
    }

    #[test]
    fn test_load_collections_accumulates_errors() {
        let dir = TempDir::new().unwrap();

        let good_path = dir.path().join("good.yml");
        std::fs::write(
            &good_path,
            "collections:\n  Marvel:\n    tmdb_collection: 86311\n",
        )
        .unwrap();

        let bad_path = dir.path().join("bad.yml");
        std::fs::write(&bad_path, "collections: [:\n").unwrap();

        let missing_path = dir.path().join("missing.yml");

        let config = LibrariesConfig {
            entries: vec![LibraryEntry {
                name: "Movies".to_string(),
                collection_files: vec![good_path, bad_path, missing_path],
            }],
        };

        let outcome = config.load_collections();
        assert_eq!(outcome.errors.len(), 2);
        assert!(outcome.errors.iter().all(|e| e.library == "Movies"));

        let movies = outcome.collections.get("Movies").unwrap();
        assert!(movies.get("Marvel").is_some());
    }

    #[test]
    fn test_collections_merge_across_files() {
        let dir = TempDir::new().unwrap();

        let first = dir.path().join("first.yml");
        std::fs::write(&first, "collections:\n  Marvel: {}\n").unwrap();
        let second = dir.path().join("second.yml");
        std::fs::write(&second, "collections:\n  Pixar: {}\n").unwrap();

        let config = LibrariesConfig {
            entries: vec![LibraryEntry {
                name: "Movies".to_string(),
                collection_files: vec![first, second],
            }],
        };

        let outcome = config.load_collections();
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.collections.get("Movies").unwrap().len(), 2);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "libraries:").unwrap();
        writeln!(file, "  Movies:").unwrap();
        writeln!(file, "    collection_files: []").unwrap();

        let config = LibrariesConfig::load(file.path()).unwrap();
        assert_eq!(config.names().collect::<Vec<_>>(), vec!["Movies"]);
    }
}

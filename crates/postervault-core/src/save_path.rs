use std::io;
use std::path::{Path, PathBuf};

const POSTER_EXT: &str = "png";

/// Pick a unique save path `<root>/<library>/<name>.png`, creating the
/// library directory if needed.
///
/// When the plain name is taken, probes `<name>_1`, `<name>_2`, ... and
/// returns the first unused path. Only the directory is created here; the
/// file itself is not.
pub fn unique_save_path(root: &Path, library: &str, name: &str) -> io::Result<PathBuf> {
    let dir = root.join(library);
    std::fs::create_dir_all(&dir)?;

    let path = dir.join(format!("{name}.{POSTER_EXT}"));
    if !path.exists() {
        return Ok(path);
    }

    let mut suffix = 1;
    loop {
        let candidate = dir.join(format!("{name}_{suffix}.{POSTER_EXT}"));
        if !candidate.exists() {
            return Ok(candidate);
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_first_use_is_plain_name() {
        let root = TempDir::new().unwrap();
        let path = unique_save_path(root.path(), "Movies", "Foo").unwrap();
        assert_eq!(path, root.path().join("Movies").join("Foo.png"));
    }

    #[test]
    fn test_creates_library_directory_but_no_file() {
        let root = TempDir::new().unwrap();
        let path = unique_save_path(root.path(), "Movies", "Foo").unwrap();
        assert!(root.path().join("Movies").is_dir());
        assert!(!path.exists());
    }

    #[test]
    fn test_collisions_get_incrementing_suffixes() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("Movies");
        std::fs::create_dir_all(&dir).unwrap();

        std::fs::write(dir.join("Foo.png"), b"x").unwrap();
        let second = unique_save_path(root.path(), "Movies", "Foo").unwrap();
        assert_eq!(second, dir.join("Foo_1.png"));

        std::fs::write(&second, b"x").unwrap();
        let third = unique_save_path(root.path(), "Movies", "Foo").unwrap();
        assert_eq!(third, dir.join("Foo_2.png"));
    }

    #[test]
    fn test_suffix_probe_starts_at_one() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("Music");
        std::fs::create_dir_all(&dir).unwrap();

        // A stale _2 file must not shift the probe: the first unused name
        // from 1 upward wins.
        std::fs::write(dir.join("Bar.png"), b"x").unwrap();
        std::fs::write(dir.join("Bar_2.png"), b"x").unwrap();
        let path = unique_save_path(root.path(), "Music", "Bar").unwrap();
        assert_eq!(path, dir.join("Bar_1.png"));
    }
}

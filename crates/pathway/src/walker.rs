//! Directory walker: enumerates every file under the routes directory.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::PathwayError;

/// A file discovered under the routes directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Path usable to open the file
    pub full_path: PathBuf,
    /// Path relative to the routes directory, `/`-separated
    pub relative_path: String,
}

/// Lists all files under `base`, sorted by path
///
/// Any error while walking is fatal: a partially listed tree would silently
/// drop routes.
pub fn walk(base: &Path) -> Result<Vec<DirectoryEntry>, PathwayError> {
    if !base.is_dir() {
        return Err(PathwayError::BaseNotFound(base.to_path_buf()));
    }

    let mut entries = Vec::new();

    for entry in WalkDir::new(base).sort_by_file_name() {
        let entry = entry.map_err(|source| PathwayError::Walk {
            path: base.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let full_path = entry.into_path();
        let relative_path = relative_to(&full_path, base);
        entries.push(DirectoryEntry {
            full_path,
            relative_path,
        });
    }

    Ok(entries)
}

/// Relative path with `/` separators regardless of platform
fn relative_to(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_walk_lists_files_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("profile/empty")).unwrap();
        fs::write(dir.path().join("index.page"), "").unwrap();
        fs::write(dir.path().join("profile/@name.page"), "").unwrap();
        fs::write(dir.path().join("logo.png"), [0u8; 4]).unwrap();

        let entries = walk(dir.path()).unwrap();
        let relative: Vec<&str> = entries.iter().map(|e| e.relative_path.as_str()).collect();

        assert_eq!(relative, vec!["index.page", "logo.png", "profile/@name.page"]);
        assert!(entries.iter().all(|e| e.full_path.is_file()));
    }

    #[test]
    fn test_walk_missing_base_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(walk(&missing), Err(PathwayError::BaseNotFound(_))));
    }

    #[test]
    fn test_walk_empty_tree() {
        let dir = tempfile::tempdir().unwrap();
        assert!(walk(dir.path()).unwrap().is_empty());
    }
}

//! Fetching files from an asset directory on disk.

use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::FileFetcher;
use crate::core::{File, ManifestError, join_path};
use crate::pattern::{PatternMatcher, validate_pattern_safety};

/// [`FileFetcher`] over a directory tree.
///
/// Patterns match a single directory level: `manifests/*.yaml` never
/// returns files from `manifests/nested/`.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn io_error(pattern: &str, source: io::Error) -> ManifestError {
        ManifestError::Io {
            pattern: pattern.to_string(),
            source,
        }
    }
}

impl FileFetcher for DirectoryFetcher {
    fn fetch_by_name(&self, name: &str) -> Result<Option<File>, ManifestError> {
        validate_pattern_safety(name)?;
        let path = self.root.join(name);
        match std::fs::read(&path) {
            Ok(data) => Ok(Some(File::new(name, data))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            // A directory with the requested name is not the file.
            Err(_) if path.is_dir() => Ok(None),
            Err(e) => Err(Self::io_error(name, e)),
        }
    }

    fn fetch_by_pattern(&self, pattern: &str) -> Result<Vec<File>, ManifestError> {
        let matcher = PatternMatcher::new(pattern)?;
        let dir = self.root.join(matcher.dir());

        match std::fs::metadata(&dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(Self::io_error(
                    pattern,
                    io::Error::other(format!("{} is not a directory", dir.display())),
                ));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("{} does not exist; no files match {}", dir.display(), pattern);
                return Ok(Vec::new());
            }
            Err(e) => return Err(Self::io_error(pattern, e)),
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let source = e.into_io_error().unwrap_or_else(|| io::Error::other("directory walk failed"));
                Self::io_error(pattern, source)
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if !matcher.matches_name(name) {
                continue;
            }
            let data = std::fs::read(entry.path()).map_err(|e| Self::io_error(pattern, e))?;
            files.push(File::new(join_path(matcher.dir(), name), data));
        }

        tracing::debug!("{} matched {} files", pattern, files.len());
        Ok(files)
    }
}

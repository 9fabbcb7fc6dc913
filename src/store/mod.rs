//! File stores: where persisted assets are read from and written to.
//!
//! Load paths only see the [`FileFetcher`] trait. Two implementations are
//! provided: [`DirectoryFetcher`] over an asset directory on disk and
//! [`MemoryFetcher`] for tests and embedding. [`persist`] is the inverse of
//! loading and writes a file set under a root directory.

mod directory;
mod memory;

pub use directory::DirectoryFetcher;
pub use memory::MemoryFetcher;

use std::path::Path;

use crate::core::{File, ManifestError};
use crate::utils::atomic_write;

/// Read access to previously persisted files.
///
/// "Nothing there" is never an error: a missing file is `Ok(None)` and a
/// pattern without matches is an empty vector.
pub trait FileFetcher {
    /// Fetch one file by its relative path.
    fn fetch_by_name(&self, name: &str) -> Result<Option<File>, ManifestError>;

    /// Fetch every file whose relative path matches `pattern`
    /// (e.g. `manifests/*.yaml`), sorted by file name.
    fn fetch_by_pattern(&self, pattern: &str) -> Result<Vec<File>, ManifestError>;
}

/// Write `files` under `root`, one atomic write per file.
pub fn persist(root: &Path, files: &[File]) -> Result<(), ManifestError> {
    for file in files {
        crate::pattern::validate_pattern_safety(&file.filename)?;
        let path = root.join(&file.filename);
        atomic_write(&path, &file.data).map_err(|e| ManifestError::Io {
            pattern: file.filename.clone(),
            source: std::io::Error::other(format!("{e:#}")),
        })?;
        tracing::debug!("Wrote {}", path.display());
    }
    tracing::info!("Wrote {} files to {}", files.len(), root.display());
    Ok(())
}

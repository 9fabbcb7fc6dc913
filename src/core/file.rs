//! The unit of persisted output: a relative file name plus raw bytes.

use std::fmt;

/// A named byte blob produced by an asset or fetched from disk.
///
/// `filename` is a relative, `/`-separated path such as
/// `manifests/cluster-config.yaml`. Within one assembled output set file
/// names are unique.
#[derive(Clone, PartialEq, Eq)]
pub struct File {
    /// Relative path of the file
    pub filename: String,
    /// Raw file contents
    pub data: Vec<u8>,
}

impl File {
    /// Create a new file.
    pub fn new(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }

    /// The last path component of the file name.
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.filename.rsplit('/').next().unwrap_or(&self.filename)
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Contents may hold key material; only print the size.
        f.debug_struct("File")
            .field("filename", &self.filename)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Sort files lexicographically by file name.
///
/// The ordering is load-bearing: output comparisons across runs and
/// re-application of manifests rely on it.
pub fn sort_files(files: &mut [File]) {
    files.sort_by(|a, b| a.filename.cmp(&b.filename));
}

/// Join a directory and a file name with `/`, skipping an empty directory.
#[must_use]
pub fn join_path(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

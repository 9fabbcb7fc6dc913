//! In-memory file store.

use std::collections::BTreeMap;

use super::FileFetcher;
use crate::core::{File, ManifestError};
use crate::pattern::PatternMatcher;

/// [`FileFetcher`] backed by a map of relative paths to contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&mut self, file: File) {
        self.files.insert(file.filename, file.data);
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FromIterator<File> for MemoryFetcher {
    fn from_iter<I: IntoIterator<Item = File>>(files: I) -> Self {
        let mut fetcher = Self::new();
        for file in files {
            fetcher.insert(file);
        }
        fetcher
    }
}

impl FileFetcher for MemoryFetcher {
    fn fetch_by_name(&self, name: &str) -> Result<Option<File>, ManifestError> {
        Ok(self.files.get(name).map(|data| File::new(name, data.clone())))
    }

    fn fetch_by_pattern(&self, pattern: &str) -> Result<Vec<File>, ManifestError> {
        let matcher = PatternMatcher::new(pattern)?;
        Ok(self
            .files
            .iter()
            .filter(|(name, _)| matcher.matches_path(name))
            .map(|(name, data)| File::new(name.clone(), data.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_fetcher_patterns() {
        let fetcher: MemoryFetcher = [
            File::new("manifests/b.yaml", "b"),
            File::new("manifests/a.yaml", "a"),
            File::new("manifests/a.json", "j"),
            File::new("tls/root-ca.crt", "c"),
        ]
        .into_iter()
        .collect();

        let yaml = fetcher.fetch_by_pattern("manifests/*.yaml").unwrap();
        let names: Vec<_> = yaml.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["manifests/a.yaml", "manifests/b.yaml"]);

        assert_eq!(fetcher.fetch_by_name("tls/root-ca.crt").unwrap().unwrap().data, b"c");
        assert!(fetcher.fetch_by_name("tls/root-ca.key").unwrap().is_none());
        assert_eq!(fetcher.len(), 4);
    }
}

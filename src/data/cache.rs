//! Caller-owned memo of loaded experiment directories.

use super::loader::{DataLoader, LoaderError};
use super::table::Table;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Remembers the tables of each directory loaded during this process run.
///
/// Only successful loads are kept, so a failed directory is retried on the next request.
#[derive(Debug, Default)]
pub struct TableCache {
    entries: HashMap<PathBuf, Arc<[Table]>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached tables for `directory`, loading them on first use.
    pub fn get_or_load(&mut self, directory: impl AsRef<Path>) -> Result<Arc<[Table]>, LoaderError> {
        let directory = directory.as_ref();
        if let Some(tables) = self.entries.get(directory) {
            return Ok(Arc::clone(tables));
        }

        info!(directory = %directory.display(), "cache miss, loading tables");
        let tables: Arc<[Table]> = DataLoader::load_tables(directory)?.into();
        self.entries
            .insert(directory.to_path_buf(), Arc::clone(&tables));
        Ok(tables)
    }

    pub fn contains(&self, directory: impl AsRef<Path>) -> bool {
        self.entries.contains_key(directory.as_ref())
    }

    /// Forget one directory so the next request re-reads it.
    pub fn invalidate(&mut self, directory: impl AsRef<Path>) -> bool {
        self.entries.remove(directory.as_ref()).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn second_request_is_served_from_memory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.csv"), "t,KPI-a\n0,1\n").unwrap();

        let mut cache = TableCache::new();
        let first = cache.get_or_load(dir.path()).unwrap();
        assert_eq!(first.len(), 1);

        // A new file is not seen until the entry is invalidated.
        fs::write(dir.path().join("b.csv"), "t,KPI-a\n0,2\n").unwrap();
        let second = cache.get_or_load(dir.path()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);

        assert!(cache.invalidate(dir.path()));
        assert_eq!(cache.get_or_load(dir.path()).unwrap().len(), 2);
    }

    #[test]
    fn failures_are_not_cached() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("later");

        let mut cache = TableCache::new();
        assert!(cache.get_or_load(&missing).is_err());
        assert!(!cache.contains(&missing));
        assert!(cache.is_empty());

        fs::create_dir(&missing).unwrap();
        assert!(cache.get_or_load(&missing).unwrap().is_empty());
        assert_eq!(cache.len(), 1);
    }
}

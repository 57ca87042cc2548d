use loader::SourceFile;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Decoded sources keyed by path, owned by whoever drives a run.
///
/// Several checks over the same tree read each file once. A cache is never
/// shared between runs, so edits between runs are always seen.
#[derive(Debug, Default)]
pub struct SourceCache {
    entries: HashMap<PathBuf, SourceFile>,
    hits: usize,
    misses: usize,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached source for `path`, reading it on first use.
    pub fn load(&mut self, path: &Path) -> anyhow::Result<&SourceFile> {
        match self.entries.entry(path.to_path_buf()) {
            Entry::Occupied(e) => {
                self.hits += 1;
                Ok(e.into_mut())
            }
            Entry::Vacant(e) => {
                self.misses += 1;
                let source = SourceFile::load(path)?;
                Ok(e.insert(source))
            }
        }
    }

    pub fn get(&self, path: &Path) -> Option<&SourceFile> {
        self.entries.get(path)
    }

    pub fn insert(&mut self, source: SourceFile) {
        self.entries.insert(source.path.clone(), source);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }
}

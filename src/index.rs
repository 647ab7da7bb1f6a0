//! The directory index built by the walk.
//!
//! Maps every visited directory (source-relative, root = `.`) to the children
//! discovered in it, in discovery order. A directory's key is created when the
//! walk enters it; its list is filled as the walk visits its children.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One child recorded under a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexEntry {
    Directory(String),
    File(String),
}

impl IndexEntry {
    pub fn name(&self) -> &str {
        match self {
            IndexEntry::Directory(name) | IndexEntry::File(name) => name,
        }
    }

    /// Listing form: directories carry a trailing `/`.
    pub fn descriptor(&self) -> String {
        match self {
            IndexEntry::Directory(name) => format!("{name}/"),
            IndexEntry::File(name) => name.clone(),
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, IndexEntry::Directory(_))
    }
}

#[derive(Debug, Default, Clone)]
pub struct DirectoryIndex {
    entries: BTreeMap<PathBuf, Vec<IndexEntry>>,
}

impl DirectoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a directory, keeping any children already recorded for it.
    pub fn visit_dir(&mut self, dir: &Path) {
        self.entries.entry(dir.to_path_buf()).or_default();
    }

    /// Append a child to `parent`'s list.
    pub fn push(&mut self, parent: &Path, entry: IndexEntry) {
        self.entries
            .entry(parent.to_path_buf())
            .or_default()
            .push(entry);
    }

    pub fn get(&self, dir: &Path) -> Option<&[IndexEntry]> {
        self.entries.get(dir).map(Vec::as_slice)
    }

    pub fn contains(&self, dir: &Path) -> bool {
        self.entries.contains_key(dir)
    }

    /// Directories in key order, each with its children in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[IndexEntry])> {
        self.entries
            .iter()
            .map(|(dir, children)| (dir.as_path(), children.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

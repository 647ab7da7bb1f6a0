//! Directory index pages.
//!
//! After the walk, every directory in the [`DirectoryIndex`] that has
//! something to show gets an `_index.adoc` written into it, which is then
//! rendered to `index.html` like any other document.
//!
//! ```text
//! = Index of guides
//!
//! .Directories
//! * link:../[]
//! * link:advanced/[]
//!
//! .Files
//! * <<install.adoc#>>
//! * <<setup.adoc#>>
//! ```
//!
//! A directory with no files and exactly one directory link gets no page.
//! Below the root that single link is `../`. The root has no parent link, so
//! a root holding one subdirectory and nothing else gets no page either,
//! while an empty root still gets a heading-only page.
//!
//! Writing or re-reading an index source is fatal on failure. Unlike a bad
//! document, a source tree that cannot be written to leaves nothing to
//! salvage.

use crate::backend::Backend;
use crate::config::{BuildConfig, IndexRefresh};
use crate::index::{DirectoryIndex, IndexEntry};
use crate::paths;
use crate::render::{Invoker, Trigger, modified};
use crate::types::{BuildError, BuildReport};
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// The contents of one index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexListing {
    /// Index key of the directory (`.` for the root).
    pub dir: PathBuf,
    /// Link targets, `../` first for non-root directories.
    pub directories: Vec<String>,
    pub files: Vec<String>,
}

impl IndexListing {
    pub fn is_root(&self) -> bool {
        self.dir == Path::new(".")
    }

    /// Number of real subdirectories, not counting the parent link.
    pub fn subdirectory_count(&self) -> usize {
        self.directories
            .len()
            .saturating_sub(usize::from(!self.is_root()))
    }
}

fn is_self_reference(name: &str) -> bool {
    matches!(name, "" | "." | "./")
}

/// Build the listing for one directory, or `None` if it would be empty.
pub fn listing(dir: &Path, entries: &[IndexEntry]) -> Option<IndexListing> {
    let mut listing = IndexListing {
        dir: dir.to_path_buf(),
        directories: Vec::new(),
        files: Vec::new(),
    };
    if !listing.is_root() {
        listing.directories.push("../".to_string());
    }

    for entry in entries {
        if is_self_reference(entry.name()) {
            continue;
        }
        if entry.is_directory() {
            listing.directories.push(entry.descriptor());
        } else if entry.name() != paths::INDEX_SOURCE {
            listing.files.push(entry.name().to_string());
        }
    }

    if listing.files.is_empty() && listing.directories.len() == 1 {
        None
    } else {
        Some(listing)
    }
}

/// Every index page the current tree would produce, in key order.
pub fn plan(index: &DirectoryIndex) -> Vec<IndexListing> {
    index
        .iter()
        .filter_map(|(dir, entries)| listing(dir, entries))
        .collect()
}

/// Render a listing as AsciiDoc.
pub fn render_source(listing: &IndexListing) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "= Index of {}", listing.dir.display());

    if !listing.directories.is_empty() {
        text.push_str("\n.Directories\n");
        for dir in &listing.directories {
            let _ = writeln!(text, "* link:{dir}[]");
        }
    }

    if !listing.files.is_empty() {
        text.push_str("\n.Files\n");
        for file in &listing.files {
            let _ = writeln!(text, "* <<{file}#>>");
        }
    }
    text
}

/// Truncate-and-write; the handle is closed before returning.
fn write_source(path: &Path, text: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(text.as_bytes())?;
    file.flush()
}

pub struct Synthesizer<'a, B> {
    config: &'a BuildConfig,
    invoker: Invoker<'a, B>,
}

impl<'a, B: Backend> Synthesizer<'a, B> {
    pub fn new(config: &'a BuildConfig, backend: &'a B) -> Self {
        Self {
            config,
            invoker: Invoker::new(config, backend),
        }
    }

    /// Write and render an index page for every directory that earns one.
    pub fn synthesize(
        &self,
        index: &DirectoryIndex,
        report: &mut BuildReport,
    ) -> Result<(), BuildError> {
        for (dir, entries) in index.iter() {
            match listing(dir, entries) {
                Some(listing) => self.emit(&listing, report)?,
                None => tracing::debug!(dir = %dir.display(), "nothing to index"),
            }
        }
        Ok(())
    }

    fn emit(&self, listing: &IndexListing, report: &mut BuildReport) -> Result<(), BuildError> {
        let source = paths::join_rel(&self.config.source, &listing.dir).join(paths::INDEX_SOURCE);
        let text = render_source(listing);
        let policy = self.config.index_refresh;

        let rewrite = policy != IndexRefresh::Changed
            || fs::read_to_string(&source).map_or(true, |previous| previous != text);
        if rewrite {
            write_source(&source, &text).map_err(|err| BuildError::IndexWrite {
                path: source.clone(),
                source: err,
            })?;
            report.indexes.push(source.clone());
        }

        let mtime = modified(&source).ok_or_else(|| BuildError::IndexWrite {
            path: source.clone(),
            source: io::Error::new(io::ErrorKind::NotFound, "index source vanished after writing"),
        })?;

        let trigger = match policy {
            IndexRefresh::Always => Trigger::Forced,
            IndexRefresh::Missing => Trigger::Missing,
            IndexRefresh::Changed if rewrite => Trigger::Forced,
            IndexRefresh::Changed => Trigger::Stale,
        };
        let output = paths::index_output_path(&self.config.output, &listing.dir);
        self.invoker.build(&source, mtime, &output, trigger, report);
        Ok(())
    }
}

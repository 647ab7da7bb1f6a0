//! Shared test utilities: scratch trees, mtime control, and a recording backend.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let src = tmp.path().join("wiki");
//! write_tree(&src, &["a.adoc", "sub/b.adoc", "img/logo.png", "empty/"]);
//!
//! let backend = MockBackend::new();
//! let report = driver::build(&test_config(&src, &tmp.path().join("out")), &backend).unwrap();
//! assert_eq!(backend.render_count(), report.render_invocations());
//! ```

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::backend::{Backend, BackendError, OutputFormat, RenderJob};
use crate::config::{BuildConfig, WikiConfig};
use crate::index::{DirectoryIndex, IndexEntry};

// =========================================================================
// Scratch trees
// =========================================================================

/// Create files (and `dir/` entries) under `root`.
///
/// Files get a one-line AsciiDoc title so they look like real documents.
pub fn write_tree(root: &Path, entries: &[&str]) {
    fs::create_dir_all(root).unwrap();
    for entry in entries {
        let path = root.join(entry);
        if entry.ends_with('/') {
            fs::create_dir_all(&path).unwrap();
        } else {
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            let title = path.file_stem().unwrap().to_string_lossy();
            fs::write(&path, format!("= {title}\n")).unwrap();
        }
    }
}

/// Create an empty file, with parent directories.
pub fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
}

pub fn set_mtime(path: &Path, time: SystemTime) {
    filetime::set_file_mtime(path, filetime::FileTime::from_system_time(time)).unwrap();
}

pub fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Default settings for the given roots.
pub fn test_config(source: &Path, output: &Path) -> BuildConfig {
    BuildConfig::new(source, output, WikiConfig::default())
}

/// Listing descriptors recorded for `key`. Panics if the key is missing.
pub fn descriptors(index: &DirectoryIndex, key: &str) -> Vec<String> {
    index
        .get(Path::new(key))
        .unwrap_or_else(|| {
            let keys: Vec<String> = index.iter().map(|(k, _)| k.display().to_string()).collect();
            panic!("no index key '{key}'. Available: {keys:?}")
        })
        .iter()
        .map(IndexEntry::descriptor)
        .collect()
}

// =========================================================================
// Recording backend
// =========================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedOp {
    Render {
        format: OutputFormat,
        args: Vec<String>,
    },
    CopyMedia {
        source: PathBuf,
        dest: PathBuf,
    },
}

/// Backend that records operations and fakes their effects.
///
/// Renders write a placeholder at the output path, so the next build sees a
/// fresh output. Media copies really copy, so output trees can be inspected.
#[derive(Default)]
pub struct MockBackend {
    operations: RefCell<Vec<RecordedOp>>,
    fail_renders: bool,
    fail_copies: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every render fails as if the renderer were not installed.
    pub fn failing_renders() -> Self {
        Self {
            fail_renders: true,
            ..Self::default()
        }
    }

    pub fn failing_copies() -> Self {
        Self {
            fail_copies: true,
            ..Self::default()
        }
    }

    pub fn operations(&self) -> Vec<RecordedOp> {
        self.operations.borrow().clone()
    }

    pub fn render_count(&self) -> usize {
        self.operations
            .borrow()
            .iter()
            .filter(|op| matches!(op, RecordedOp::Render { .. }))
            .count()
    }
}

impl Backend for MockBackend {
    fn render(&self, job: &RenderJob<'_>) -> Result<(), BackendError> {
        self.operations.borrow_mut().push(RecordedOp::Render {
            format: job.format,
            args: job
                .args()
                .iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect(),
        });
        if self.fail_renders {
            return Err(BackendError::Spawn {
                program: "mock-renderer".to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "not installed"),
            });
        }
        if let Some(parent) = job.output.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(job.output, format!("rendered from {}\n", job.input.display()))?;
        Ok(())
    }

    fn copy_media(&self, source: &Path, dest: &Path) -> Result<(), BackendError> {
        self.operations.borrow_mut().push(RecordedOp::CopyMedia {
            source: source.to_path_buf(),
            dest: dest.to_path_buf(),
        });
        if self.fail_copies {
            return Err(BackendError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "read-only output",
            )));
        }
        copy_dir_recursive(source, dest)?;
        Ok(())
    }
}

//! Single-pass walk of the source tree.
//!
//! The walk is pre-order and sorted by file name within each directory, so
//! discovery order (and therefore link order on index pages) is stable.
//!
//! Every entry is handled the same way:
//!
//! 1. If it lies under the output root, skip it with its subtree. This keeps a
//!    build that writes into the source tree from picking up its own output.
//! 2. Classify it (see [`crate::classify`]).
//! 3. Directories get a key in the [`DirectoryIndex`] and are appended to their
//!    parent's list. Media directories are then copied wholesale and skipped.
//! 4. Content files are appended to their parent's list and handed to the
//!    [`Invoker`].
//!
//! Errors while enumerating the tree are recorded as warnings and the walk
//! carries on. A failed media copy aborts the walk.

use crate::backend::Backend;
use crate::classify::{EntryKind, classify};
use crate::config::BuildConfig;
use crate::index::{DirectoryIndex, IndexEntry};
use crate::paths;
use crate::render::{Invoker, Trigger};
use crate::types::{BuildError, BuildReport, BuildWarning};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

enum Visit {
    Continue,
    SkipSubtree,
}

pub struct Walker<'a, B> {
    config: &'a BuildConfig,
    backend: &'a B,
    invoker: Invoker<'a, B>,
    output_root: PathBuf,
}

impl<'a, B: Backend> Walker<'a, B> {
    pub fn new(config: &'a BuildConfig, backend: &'a B) -> Result<Self, BuildError> {
        Ok(Self {
            config,
            backend,
            invoker: Invoker::new(config, backend),
            output_root: paths::absolute(&config.output)?,
        })
    }

    /// Walk the source root once and return the completed index.
    pub fn walk(&self, report: &mut BuildReport) -> Result<DirectoryIndex, BuildError> {
        let mut index = DirectoryIndex::new();
        let mut entries = WalkDir::new(&self.config.source)
            .sort_by_file_name()
            .into_iter();

        while let Some(next) = entries.next() {
            let entry = match next {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.config.source.clone());
                    report.warn(BuildWarning::Walk {
                        path,
                        message: err.to_string(),
                    });
                    continue;
                }
            };

            if let Visit::SkipSubtree = self.visit(&entry, &mut index, report)?
                && entry.file_type().is_dir()
            {
                entries.skip_current_dir();
            }
        }

        tracing::debug!(directories = index.len(), "walk complete");
        Ok(index)
    }

    fn visit(
        &self,
        entry: &DirEntry,
        index: &mut DirectoryIndex,
        report: &mut BuildReport,
    ) -> Result<Visit, BuildError> {
        let path = entry.path();

        if self.inside_output(path) {
            tracing::debug!(path = %path.display(), "skipping output tree");
            return Ok(Visit::SkipSubtree);
        }

        let Some(rel) = paths::relative_to(path, &self.config.source) else {
            return Ok(Visit::Continue);
        };
        let Some(parent) = paths::parent_key(&rel) else {
            index.visit_dir(&rel);
            return Ok(Visit::Continue);
        };

        let name = entry.file_name().to_string_lossy();
        let is_dir = entry.file_type().is_dir();

        match classify(&name, is_dir, self.config) {
            EntryKind::Excluded => {
                tracing::debug!(path = %path.display(), "excluded");
                Ok(Visit::SkipSubtree)
            }
            EntryKind::Media => {
                index.visit_dir(&rel);
                index.push(&parent, IndexEntry::Directory(name.into_owned()));
                self.copy_media(path, &rel, report)?;
                Ok(Visit::SkipSubtree)
            }
            EntryKind::Directory => {
                index.visit_dir(&rel);
                index.push(&parent, IndexEntry::Directory(name.into_owned()));
                Ok(Visit::Continue)
            }
            EntryKind::Content => {
                index.push(&parent, IndexEntry::File(name.into_owned()));
                let output = paths::output_path(&self.config.output, &rel);
                match entry.metadata().map_err(io::Error::from).and_then(|m| m.modified()) {
                    Ok(mtime) => self.invoker.build(path, mtime, &output, Trigger::Stale, report),
                    Err(err) => report.warn(BuildWarning::Walk {
                        path: path.to_path_buf(),
                        message: err.to_string(),
                    }),
                }
                Ok(Visit::Continue)
            }
            EntryKind::IndexPlaceholder | EntryKind::Other => Ok(Visit::Continue),
        }
    }

    fn copy_media(
        &self,
        path: &Path,
        rel: &Path,
        report: &mut BuildReport,
    ) -> Result<(), BuildError> {
        let dest = paths::join_rel(&self.config.output, rel);
        tracing::info!("{} ⇒ {}", path.display(), dest.display());
        self.backend
            .copy_media(path, &dest)
            .map_err(|source| BuildError::MediaCopy {
                path: path.to_path_buf(),
                source,
            })?;
        report.media.push(dest);
        Ok(())
    }

    fn inside_output(&self, path: &Path) -> bool {
        paths::absolute(path).is_ok_and(|abs| paths::is_within(&abs, &self.output_root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::OutputFormat;
    use crate::test_helpers::{MockBackend, RecordedOp, descriptors, test_config, write_tree};
    use tempfile::TempDir;

    #[test]
    fn records_children_in_discovery_order() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("wiki");
        write_tree(&src, &["a.adoc", "b.adoc", "sub/c.adoc"]);
        let config = test_config(&src, &tmp.path().join("out"));

        let backend = MockBackend::new();
        let mut report = BuildReport::default();
        let index = Walker::new(&config, &backend).unwrap().walk(&mut report).unwrap();

        assert_eq!(descriptors(&index, "."), vec!["a.adoc", "b.adoc", "sub/"]);
        assert_eq!(descriptors(&index, "sub"), vec!["c.adoc"]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn every_directory_gets_a_key() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("wiki");
        write_tree(&src, &["empty/", "deep/er/x.txt"]);
        let config = test_config(&src, &tmp.path().join("out"));

        let backend = MockBackend::new();
        let index = Walker::new(&config, &backend)
            .unwrap()
            .walk(&mut BuildReport::default())
            .unwrap();

        for key in [".", "empty", "deep", "deep/er"] {
            assert!(index.contains(Path::new(key)), "missing key {key}");
        }
        assert!(descriptors(&index, "deep/er").is_empty());
    }

    #[test]
    fn root_written_with_trailing_slash_uses_same_key() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("wiki");
        write_tree(&src, &["a.adoc"]);
        let mut root = src.clone().into_os_string();
        root.push("/./");
        let config = test_config(Path::new(&root), &tmp.path().join("out"));

        let backend = MockBackend::new();
        let mut report = BuildReport::default();
        let index = Walker::new(&config, &backend).unwrap().walk(&mut report).unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(descriptors(&index, "."), vec!["a.adoc"]);
        assert_eq!(report.rendered[0].output, tmp.path().join("out/a.html"));
    }

    #[test]
    fn content_files_rendered_under_output_root() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("wiki");
        write_tree(&src, &["guides/setup.adoc", "guides/notes.txt"]);
        let config = test_config(&src, &tmp.path().join("out"));

        let backend = MockBackend::new();
        let mut report = BuildReport::default();
        Walker::new(&config, &backend).unwrap().walk(&mut report).unwrap();

        assert_eq!(report.rendered.len(), 1);
        assert_eq!(report.rendered[0].format, OutputFormat::Html);
        assert_eq!(report.rendered[0].source, src.join("guides/setup.adoc"));
        assert_eq!(
            report.rendered[0].output,
            tmp.path().join("out/guides/setup.html")
        );
    }

    #[test]
    fn excluded_directory_is_never_entered() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("wiki");
        write_tree(&src, &[".git/notes.adoc", "drafts/wip.adoc", "a.adoc"]);
        let mut config = test_config(&src, &tmp.path().join("out"));
        config.exclude.push("drafts".into());

        let backend = MockBackend::new();
        let mut report = BuildReport::default();
        let index = Walker::new(&config, &backend).unwrap().walk(&mut report).unwrap();

        assert_eq!(descriptors(&index, "."), vec!["a.adoc"]);
        assert!(!index.contains(Path::new("drafts")));
        assert_eq!(report.rendered.len(), 1);
    }

    #[test]
    fn excluded_file_does_not_hide_siblings() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("wiki");
        write_tree(&src, &["a.adoc", "b.adoc", "c.adoc"]);
        let mut config = test_config(&src, &tmp.path().join("out"));
        config.exclude.push("a.adoc".into());

        let backend = MockBackend::new();
        let index = Walker::new(&config, &backend)
            .unwrap()
            .walk(&mut BuildReport::default())
            .unwrap();

        assert_eq!(descriptors(&index, "."), vec!["b.adoc", "c.adoc"]);
    }

    #[test]
    fn media_directory_copied_once_and_not_descended() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("wiki");
        write_tree(&src, &["img/logo.png", "img/inner/page.adoc", "a.adoc"]);
        let config = test_config(&src, &tmp.path().join("out"));

        let backend = MockBackend::new();
        let mut report = BuildReport::default();
        let index = Walker::new(&config, &backend).unwrap().walk(&mut report).unwrap();

        let copies: Vec<RecordedOp> = backend
            .operations()
            .into_iter()
            .filter(|op| matches!(op, RecordedOp::CopyMedia { .. }))
            .collect();
        assert_eq!(
            copies,
            vec![RecordedOp::CopyMedia {
                source: src.join("img"),
                dest: tmp.path().join("out/img"),
            }]
        );
        assert_eq!(descriptors(&index, "."), vec!["a.adoc", "img/"]);
        assert!(descriptors(&index, "img").is_empty());
        assert_eq!(report.rendered.len(), 1);
        assert_eq!(report.media, vec![tmp.path().join("out/img")]);
    }

    #[test]
    fn media_copy_failure_aborts_walk() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("wiki");
        write_tree(&src, &["img/logo.png"]);
        let config = test_config(&src, &tmp.path().join("out"));

        let backend = MockBackend::failing_copies();
        let result = Walker::new(&config, &backend)
            .unwrap()
            .walk(&mut BuildReport::default());

        assert!(matches!(result, Err(BuildError::MediaCopy { ref path, .. }) if *path == src.join("img")));
    }

    #[test]
    fn output_inside_source_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("wiki");
        write_tree(&src, &["a.adoc", "public/stale.adoc"]);
        let config = test_config(&src, &src.join("public"));

        let backend = MockBackend::new();
        let mut report = BuildReport::default();
        let index = Walker::new(&config, &backend).unwrap().walk(&mut report).unwrap();

        assert_eq!(descriptors(&index, "."), vec!["a.adoc"]);
        assert!(!index.contains(Path::new("public")));
        assert_eq!(report.rendered.len(), 1);
    }

    #[test]
    fn placeholder_and_other_files_not_recorded() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("wiki");
        write_tree(&src, &["_index.adoc", "README.md", "wiki.toml", "a.adoc"]);
        let config = test_config(&src, &tmp.path().join("out"));

        let backend = MockBackend::new();
        let mut report = BuildReport::default();
        let index = Walker::new(&config, &backend).unwrap().walk(&mut report).unwrap();

        assert_eq!(descriptors(&index, "."), vec!["a.adoc"]);
        assert_eq!(report.rendered.len(), 1);
    }

    #[test]
    fn root_name_is_not_classified() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("img");
        write_tree(&src, &["a.adoc"]);
        let config = test_config(&src, &tmp.path().join("out"));

        let backend = MockBackend::new();
        let mut report = BuildReport::default();
        Walker::new(&config, &backend).unwrap().walk(&mut report).unwrap();

        assert!(report.media.is_empty());
        assert_eq!(report.rendered.len(), 1);
    }

    #[test]
    fn missing_source_root_is_a_warning() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp.path().join("nope"), &tmp.path().join("out"));

        let backend = MockBackend::new();
        let mut report = BuildReport::default();
        let index = Walker::new(&config, &backend).unwrap().walk(&mut report).unwrap();

        assert!(index.is_empty());
        assert!(matches!(report.warnings[..], [BuildWarning::Walk { .. }]));
    }
}

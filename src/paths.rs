//! Path normalization and output location derivation.
//!
//! Directory index keys and output locations are both derived from the
//! *source-relative* path of an entry. Everything here is lexical: nothing
//! touches the filesystem except [`absolute`], which only consults the
//! current directory.
//!
//! ```text
//! source root   wiki/
//! entry         wiki/guides/./setup.adoc
//! relative      guides/setup.adoc
//! output        html/guides/setup.html
//! pdf sibling   html/guides/setup.pdf
//! ```

use std::io;
use std::path::{Component, Path, PathBuf};

/// Extension of source documents.
pub const SOURCE_EXT: &str = "adoc";
/// Extension the renderer produces.
pub const TARGET_EXT: &str = "html";
/// Extension of the PDF variant.
pub const PDF_EXT: &str = "pdf";
/// Reserved name of the synthesized index source in each directory.
pub const INDEX_SOURCE: &str = "_index.adoc";
/// File stem of a rendered index page.
pub const INDEX_STEM: &str = "index";

/// Collapse `.` segments and resolve `..` lexically.
///
/// An empty result becomes `.`, so `./`, `.` and `a/..` all name the same key.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}

/// Make a path absolute against the current directory, then normalize it.
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
    std::path::absolute(path).map(|p| normalize(&p))
}

/// Whether `path` lies at or below `root` (both already absolute and normalized).
pub fn is_within(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}

/// Strip `root` from `path`, returning the normalized remainder (`.` for the root itself).
///
/// Returns `None` when `path` is not below `root`.
pub fn relative_to(path: &Path, root: &Path) -> Option<PathBuf> {
    let path = normalize(path);
    let root = normalize(root);
    if root == Path::new(".") {
        return Some(path);
    }
    path.strip_prefix(&root).ok().map(normalize)
}

/// Index key of the directory containing `rel`, or `None` for the root itself.
pub fn parent_key(rel: &Path) -> Option<PathBuf> {
    if rel == Path::new(".") {
        return None;
    }
    match rel.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Some(parent.to_path_buf()),
        _ => Some(PathBuf::from(".")),
    }
}

/// Join a source-relative path under `base`, treating `.` as `base` itself.
pub fn join_rel(base: &Path, rel: &Path) -> PathBuf {
    if rel == Path::new(".") {
        base.to_path_buf()
    } else {
        base.join(rel)
    }
}

/// Output location of a content file: relocated under `out_root` with the target extension.
pub fn output_path(out_root: &Path, rel: &Path) -> PathBuf {
    join_rel(out_root, rel).with_extension(TARGET_EXT)
}

/// Output location of a directory's index page.
pub fn index_output_path(out_root: &Path, dir_key: &Path) -> PathBuf {
    join_rel(out_root, dir_key).join(format!("{INDEX_STEM}.{TARGET_EXT}"))
}

/// The `.pdf` sibling of an output path.
pub fn pdf_sibling(output: &Path) -> PathBuf {
    output.with_extension(PDF_EXT)
}

/// Whether a file name carries the source content extension.
pub fn has_source_ext(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext == SOURCE_EXT)
}

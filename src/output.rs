//! CLI output formatting for `build` and `check`.
//!
//! Paths are shown relative to the root they live under: sources relative to
//! the source root, outputs relative to the output root. Anything outside its
//! root (which should not happen) is shown in full.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Rendered
//!     html guides/setup.adoc → guides/setup.html
//!     pdf  guides/setup.adoc → guides/setup.pdf
//!     html _index.adoc → index.html
//!
//! Media
//!     img/
//!
//! Index sources
//!     _index.adoc
//!
//! Warnings
//!     html render of notes.adoc failed: asciidoctor failed (exit status: 1)
//!
//! Rendered 3 targets, 12 up to date, 1 media directory, 1 index source, 1 warning
//! ```
//!
//! ## Check
//!
//! ```text
//! Would render
//!     html guides/setup.adoc → guides/setup.html
//!
//! Would copy
//!     img/
//!
//! Index pages
//!     . (1 directory, 2 files)
//!     guides (0 directories, 1 file)
//!
//! 1 stale target, 14 up to date
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::config::BuildConfig;
use crate::driver::CheckReport;
use crate::synth::IndexListing;
use crate::types::{BuildReport, RenderedTarget};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

const INDENT: &str = "    ";

/// `path` relative to `root`, or `path` itself if it is elsewhere.
fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// `1 file`, `2 files`.
fn count(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

/// One rendered target, format column padded to the widest format name.
///
/// ```text
/// html guides/setup.adoc → guides/setup.html
/// pdf  guides/setup.adoc → guides/setup.pdf
/// ```
fn target_line(target: &RenderedTarget, config: &BuildConfig) -> String {
    format!(
        "{:<4} {} \u{2192} {}",
        target.format.to_string(),
        relative(&target.source, &config.source),
        relative(&target.output, &config.output)
    )
}

fn media_line(dest: &Path, config: &BuildConfig) -> String {
    format!("{}/", relative(dest, &config.output))
}

fn index_line(listing: &IndexListing) -> String {
    format!(
        "{} ({}, {})",
        listing.dir.display(),
        count(listing.subdirectory_count(), "directory", "directories"),
        count(listing.files.len(), "file", "files")
    )
}

/// Push a titled section, preceded by a blank line unless it is the first.
fn section(lines: &mut Vec<String>, title: &str, body: Vec<String>) {
    if body.is_empty() {
        return;
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(title.to_string());
    lines.extend(body.into_iter().map(|line| format!("{INDENT}{line}")));
}

// ============================================================================
// build
// ============================================================================

/// Format the summary of a finished build.
pub fn format_build_report(report: &BuildReport, config: &BuildConfig) -> Vec<String> {
    let mut lines = Vec::new();

    section(
        &mut lines,
        "Rendered",
        report
            .rendered
            .iter()
            .map(|t| target_line(t, config))
            .collect(),
    );
    section(
        &mut lines,
        "Media",
        report.media.iter().map(|m| media_line(m, config)).collect(),
    );
    section(
        &mut lines,
        "Index sources",
        report
            .indexes
            .iter()
            .map(|p| relative(p, &config.source))
            .collect(),
    );
    section(
        &mut lines,
        "Warnings",
        report.warnings.iter().map(ToString::to_string).collect(),
    );

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Rendered {}, {} up to date, {}, {}, {}",
        count(report.rendered.len(), "target", "targets"),
        report.up_to_date,
        count(report.media.len(), "media directory", "media directories"),
        count(report.indexes.len(), "index source", "index sources"),
        count(report.warnings.len(), "warning", "warnings"),
    ));
    lines
}

pub fn print_build_report(report: &BuildReport, config: &BuildConfig) {
    for line in format_build_report(report, config) {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

/// Format what a build would do.
pub fn format_check_report(check: &CheckReport, config: &BuildConfig) -> Vec<String> {
    let report = &check.report;
    let mut lines = Vec::new();

    section(
        &mut lines,
        "Would render",
        report
            .rendered
            .iter()
            .map(|t| target_line(t, config))
            .collect(),
    );
    section(
        &mut lines,
        "Would copy",
        report.media.iter().map(|m| media_line(m, config)).collect(),
    );
    section(
        &mut lines,
        "Index pages",
        check.indexes.iter().map(index_line).collect(),
    );
    section(
        &mut lines,
        "Warnings",
        report.warnings.iter().map(ToString::to_string).collect(),
    );

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "{}, {} up to date",
        count(report.rendered.len(), "stale target", "stale targets"),
        report.up_to_date
    ));
    lines
}

pub fn print_check_report(check: &CheckReport, config: &BuildConfig) {
    for line in format_check_report(check, config) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Staleness checks and renderer dispatch.
//!
//! A target is rebuilt when its output is missing, its output is older than
//! the source, or the caller forces it. An output whose mtime *equals* the
//! source's counts as fresh, so a second build over unchanged sources
//! renders nothing.
//!
//! With PDF output enabled, the `.pdf` sibling gets its own independent
//! check: a fresh HTML page does not imply a fresh PDF and vice versa.
//!
//! Renderer failures are soft. They become [`BuildWarning::Render`] entries
//! in the report and the build moves on to the next file.

use crate::backend::{Backend, OutputFormat, RenderJob};
use crate::config::BuildConfig;
use crate::paths;
use crate::types::{BuildReport, BuildWarning, RenderedTarget};
use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// Why a target may be rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Rebuild if the output is missing or older than the source.
    Stale,
    /// Rebuild unconditionally.
    Forced,
    /// Rebuild only if the output does not exist.
    Missing,
}

/// Modification time of `path`, if it exists and the platform reports one.
pub fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// `output missing || output older than source || forced`.
pub fn is_stale(output: &Path, source_mtime: SystemTime, forced: bool) -> bool {
    if forced {
        return true;
    }
    match modified(output) {
        Some(built) => built < source_mtime,
        None => true,
    }
}

fn needs_build(output: &Path, source_mtime: SystemTime, trigger: Trigger) -> bool {
    match trigger {
        Trigger::Stale => is_stale(output, source_mtime, false),
        Trigger::Forced => true,
        Trigger::Missing => !output.exists(),
    }
}

/// Decides per target whether to render, and records the outcome.
pub struct Invoker<'a, B> {
    config: &'a BuildConfig,
    backend: &'a B,
}

impl<'a, B: Backend> Invoker<'a, B> {
    pub fn new(config: &'a BuildConfig, backend: &'a B) -> Self {
        Self { config, backend }
    }

    /// Render `source` to `output` (and its PDF sibling when enabled) if stale.
    pub fn build(
        &self,
        source: &Path,
        source_mtime: SystemTime,
        output: &Path,
        trigger: Trigger,
        report: &mut BuildReport,
    ) {
        let trigger = if self.config.force {
            Trigger::Forced
        } else {
            trigger
        };

        self.dispatch(OutputFormat::Html, source, source_mtime, output, trigger, report);

        if self.config.pdf {
            let pdf = paths::pdf_sibling(output);
            self.dispatch(OutputFormat::Pdf, source, source_mtime, &pdf, trigger, report);
        }
    }

    fn dispatch(
        &self,
        format: OutputFormat,
        source: &Path,
        source_mtime: SystemTime,
        output: &Path,
        trigger: Trigger,
        report: &mut BuildReport,
    ) {
        if !needs_build(output, source_mtime, trigger) {
            tracing::debug!(output = %output.display(), "up to date");
            report.up_to_date += 1;
            return;
        }

        let job = RenderJob {
            format,
            input: source,
            output,
            requires: &self.config.requires,
        };
        match self.backend.render(&job) {
            Ok(()) => {
                tracing::info!("{} → {}", source.display(), output.display());
                report.rendered.push(RenderedTarget {
                    format,
                    source: source.to_path_buf(),
                    output: output.to_path_buf(),
                });
            }
            Err(err) => report.warn(BuildWarning::Render {
                input: source.to_path_buf(),
                output: output.to_path_buf(),
                format,
                message: err.to_string(),
            }),
        }
    }
}

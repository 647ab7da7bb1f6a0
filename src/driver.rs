//! Top-level build entry points.
//!
//! ```text
//! walk      source tree  →  DirectoryIndex   (renders stale documents, copies media)
//! synthesize DirectoryIndex → _index.adoc     (renders index pages)
//! ```
//!
//! Both run in one thread, one after the other; the index is complete before
//! synthesis reads it.

use crate::backend::{Backend, DryRun};
use crate::config::BuildConfig;
use crate::synth::{self, IndexListing, Synthesizer};
use crate::types::{BuildError, BuildReport};
use crate::walk::Walker;

/// Run a full incremental build.
pub fn build(config: &BuildConfig, backend: &impl Backend) -> Result<BuildReport, BuildError> {
    let mut report = BuildReport::default();

    tracing::info!(source = %config.source.display(), "walking");
    let index = Walker::new(config, backend)?.walk(&mut report)?;

    tracing::info!(directories = index.len(), "writing index pages");
    Synthesizer::new(config, backend).synthesize(&index, &mut report)?;

    Ok(report)
}

/// What a build would do, without writing or spawning anything.
#[derive(Debug)]
pub struct CheckReport {
    /// Targets that would be rendered, and media that would be copied.
    pub report: BuildReport,
    /// Index pages that would be written.
    pub indexes: Vec<IndexListing>,
}

/// Walk the tree with a no-op backend and plan the index pages.
pub fn check(config: &BuildConfig) -> Result<CheckReport, BuildError> {
    let mut report = BuildReport::default();
    let index = Walker::new(config, &DryRun)?.walk(&mut report)?;
    Ok(CheckReport {
        report,
        indexes: synth::plan(&index),
    })
}

//! Build results shared by the walker, the synthesizer and the CLI.
//!
//! Soft failures never abort a build; they accumulate here as
//! [`BuildWarning`]s and are reported once the build finishes.

use crate::backend::{BackendError, OutputFormat};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A failure that stops the build.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("copying media directory {} failed: {source}", path.display())]
    MediaCopy {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("cannot write index source {}: {source}", path.display())]
    IndexWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A problem that was recorded and skipped over.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BuildWarning {
    /// An entry could not be read while enumerating the source tree.
    #[error("cannot read {}: {message}", path.display())]
    Walk { path: PathBuf, message: String },
    /// The renderer could not be started or exited unsuccessfully.
    #[error("{format} render of {} failed: {message}", input.display())]
    Render {
        input: PathBuf,
        output: PathBuf,
        format: OutputFormat,
        message: String,
    },
}

/// An output the renderer produced during this build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedTarget {
    pub format: OutputFormat,
    pub source: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct BuildReport {
    /// Successful renderer invocations, in order.
    pub rendered: Vec<RenderedTarget>,
    /// Targets skipped because their output was already fresh.
    pub up_to_date: usize,
    /// Output directories media was copied into.
    pub media: Vec<PathBuf>,
    /// Index sources written this build.
    pub indexes: Vec<PathBuf>,
    pub warnings: Vec<BuildWarning>,
}

impl BuildReport {
    pub fn warn(&mut self, warning: BuildWarning) {
        self.warnings.push(warning);
    }

    /// Every renderer invocation attempted, successful or not.
    pub fn render_invocations(&self) -> usize {
        let failed = self
            .warnings
            .iter()
            .filter(|w| matches!(w, BuildWarning::Render { .. }))
            .count();
        self.rendered.len() + failed
    }

    /// Outputs rendered from `source`, in invocation order.
    pub fn outputs_of(&self, source: &Path) -> Vec<&Path> {
        self.rendered
            .iter()
            .filter(|t| t.source == source)
            .map(|t| t.output.as_path())
            .collect()
    }
}

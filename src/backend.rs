//! External process backend.
//!
//! The [`Backend`] trait covers the two things the build delegates to other
//! programs: rendering a document and copying a media directory. The rest of
//! the crate is backend-agnostic.
//!
//! The production implementation is [`CommandBackend`], which spawns the
//! configured programs and waits for each one to exit. [`DryRun`] accepts
//! every request without doing anything and backs the `check` command.

use crate::config::Programs;
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} failed ({status}){}", stderr_suffix(.stderr))]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    match stderr.lines().rev().find(|l| !l.trim().is_empty()) {
        Some(line) => format!(": {}", line.trim()),
        None => String::new(),
    }
}

/// Which renderer a job goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Html,
    Pdf,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Html => f.write_str("html"),
            OutputFormat::Pdf => f.write_str("pdf"),
        }
    }
}

/// One renderer invocation.
#[derive(Debug, Clone)]
pub struct RenderJob<'a> {
    pub format: OutputFormat,
    pub input: &'a Path,
    pub output: &'a Path,
    pub requires: &'a [String],
}

impl RenderJob<'_> {
    /// Renderer arguments: `-o <output> [-r <req>]... <input>`.
    pub fn args(&self) -> Vec<OsString> {
        let mut args = Vec::with_capacity(3 + 2 * self.requires.len());
        args.push(OsString::from("-o"));
        args.push(self.output.as_os_str().to_owned());
        for req in self.requires {
            args.push(OsString::from("-r"));
            args.push(OsString::from(req));
        }
        args.push(self.input.as_os_str().to_owned());
        args
    }
}

pub trait Backend {
    /// Render one document. Blocks until the renderer exits.
    fn render(&self, job: &RenderJob<'_>) -> Result<(), BackendError>;

    /// Copy the contents of `source` into `dest`, creating `dest` first.
    fn copy_media(&self, source: &Path, dest: &Path) -> Result<(), BackendError>;
}

/// Spawns the configured external programs.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    programs: Programs,
}

impl CommandBackend {
    pub fn new(programs: &Programs) -> Self {
        Self {
            programs: programs.clone(),
        }
    }

    fn program(&self, format: OutputFormat) -> &str {
        match format {
            OutputFormat::Html => &self.programs.html,
            OutputFormat::Pdf => &self.programs.pdf,
        }
    }
}

impl Backend for CommandBackend {
    fn render(&self, job: &RenderJob<'_>) -> Result<(), BackendError> {
        run(self.program(job.format), job.args())
    }

    fn copy_media(&self, source: &Path, dest: &Path) -> Result<(), BackendError> {
        fs::create_dir_all(dest)?;
        // `src/.` copies the directory's contents rather than nesting it.
        let args = vec![
            OsString::from("-Rf"),
            source.join(".").into_os_string(),
            dest.as_os_str().to_owned(),
        ];
        run(&self.programs.copy, args)
    }
}

fn run(program: &str, args: Vec<OsString>) -> Result<(), BackendError> {
    tracing::debug!(program, ?args, "spawning");
    let output = Command::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| BackendError::Spawn {
            program: program.to_string(),
            source,
        })?;
    if output.status.success() {
        Ok(())
    } else {
        Err(BackendError::Failed {
            program: program.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Accepts every request and touches nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRun;

impl Backend for DryRun {
    fn render(&self, _job: &RenderJob<'_>) -> Result<(), BackendError> {
        Ok(())
    }

    fn copy_media(&self, _source: &Path, _dest: &Path) -> Result<(), BackendError> {
        Ok(())
    }
}

//! # wiki-build
//!
//! An incremental build driver for AsciiDoc wikis. The source tree is the
//! wiki: every `.adoc` file becomes an `.html` page at the same relative path
//! in the output tree, media directories are copied across untouched, and
//! every directory with something in it gets a generated index page.
//!
//! Rendering itself is delegated to `asciidoctor` (and `asciidoctor-pdf` for
//! optional PDF output). This crate decides *what* to render and *when*.
//!
//! # Architecture: Walk, Then Synthesize
//!
//! ```text
//! 1. Walk        source/  →  DirectoryIndex   (render stale pages, copy media)
//! 2. Synthesize  index    →  _index.adoc      (write and render index pages)
//! ```
//!
//! The walk is a single sorted pre-order pass. It records every directory and
//! every content file in a [`index::DirectoryIndex`] and renders documents as
//! it meets them. Synthesis runs once the walk has finished, so each index page
//! sees its directory's complete listing.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`driver`] | Entry points: `build` and the dry-run `check` |
//! | [`walk`] | Source tree traversal, output-tree guard, media passthrough |
//! | [`classify`] | Decides what kind of entry a file or directory is |
//! | [`render`] | Staleness checks and renderer dispatch, HTML and PDF |
//! | [`synth`] | Index page listings, AsciiDoc generation, refresh policy |
//! | [`index`] | The directory → children map the walk fills in |
//! | [`backend`] | The `Backend` trait and its process-spawning implementation |
//! | [`config`] | `wiki.toml` loading, merging, validation and CLI overrides |
//! | [`paths`] | Output path mapping and path normalization |
//! | [`types`] | Build report, warnings and fatal errors |
//! | [`output`] | CLI output formatting for build and check results |
//!
//! # Design Decisions
//!
//! ## Timestamps, Not Hashes
//!
//! An output is rebuilt when it is missing or older than its source. Nothing
//! else is stored between runs: no cache file, no manifest. Deleting the
//! output tree is always a valid way to force a full rebuild.
//!
//! ## Soft Render Failures
//!
//! A document that fails to render is reported and skipped; the rest of the
//! wiki still builds. Only failures that leave the build in an unknown state
//! (media that could not be copied, an index source that could not be
//! written) stop it.
//!
//! ## Renderers Behind a Trait
//!
//! All process spawning goes through [`backend::Backend`]. Tests substitute a
//! recording backend and never need Ruby installed; `check` substitutes a
//! no-op backend to preview a build.

pub mod backend;
pub mod classify;
pub mod config;
pub mod driver;
pub mod index;
pub mod output;
pub mod paths;
pub mod render;
pub mod synth;
pub mod types;
pub mod walk;

#[cfg(test)]
pub(crate) mod test_helpers;

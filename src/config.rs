//! Build configuration.
//!
//! Configuration is read once at startup and frozen into a [`BuildConfig`]
//! before the walk begins. Three layers are merged, later layers winning:
//!
//! ```text
//! stock defaults  →  <source>/wiki.toml  →  command-line flags
//! ```
//!
//! ## Config File
//!
//! `wiki.toml` is optional and sparse: specify only what you want to change.
//!
//! ```toml
//! exclude = ["html", ".git"]      # names skipped with their whole subtree
//! media = ["img", "resources"]    # directories copied verbatim
//! pdf = false                     # also render a .pdf next to every .html
//! requires = []                   # forwarded to the renderer as `-r <value>`
//! index_refresh = "changed"       # always | missing | changed
//!
//! [programs]
//! html = "asciidoctor"
//! pdf = "asciidoctor-pdf"
//! copy = "cp"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::paths;

/// Name of the optional config file in the source root.
pub const CONFIG_FILENAME: &str = "wiki.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// When index sources are rewritten and index pages re-rendered.
///
/// `Always` and `Missing` overwrite `_index.adoc` on every build, so the
/// ordinary mtime rule alone would re-render every index page every time.
/// `Changed` departs from that: an `_index.adoc` whose text already matches
/// the listing is left untouched, mtime included, so an unchanged tree
/// rebuilds nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IndexRefresh {
    /// Overwrite the source and re-render every index page on every build.
    Always,
    /// Overwrite the source; render an index page only if it has never been built.
    Missing,
    /// Rewrite the index source only when the listing changed; render when
    /// rewritten or when the page is missing.
    #[default]
    Changed,
}

/// External programs the build shells out to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Programs {
    /// Renderer producing `.html` output.
    pub html: String,
    /// Renderer producing `.pdf` output.
    pub pdf: String,
    /// Recursive copy used for media directories.
    pub copy: String,
}

impl Default for Programs {
    fn default() -> Self {
        Self {
            html: "asciidoctor".to_string(),
            pdf: "asciidoctor-pdf".to_string(),
            copy: "cp".to_string(),
        }
    }
}

/// Settings loaded from `wiki.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WikiConfig {
    /// Entry names skipped together with their subtree.
    pub exclude: Vec<String>,
    /// Directory names copied verbatim instead of rendered.
    pub media: Vec<String>,
    /// Render a PDF variant alongside every HTML output.
    pub pdf: bool,
    /// Values forwarded to the renderer as `-r <value>`, in order.
    pub requires: Vec<String>,
    /// Index page refresh policy.
    pub index_refresh: IndexRefresh,
    /// External program names.
    pub programs: Programs,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            exclude: vec!["html".to_string(), ".git".to_string()],
            media: vec!["img".to_string(), "resources".to_string()],
            pdf: false,
            requires: Vec::new(),
            index_refresh: IndexRefresh::default(),
            programs: Programs::default(),
        }
    }
}

impl WikiConfig {
    /// Validate names and program settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, names) in [("exclude", &self.exclude), ("media", &self.media)] {
            for name in names {
                if name.is_empty() || name.contains(['/', '\\']) {
                    return Err(ConfigError::Validation(format!(
                        "{field} entries must be plain entry names, got {name:?}"
                    )));
                }
            }
        }
        for (field, program) in [
            ("programs.html", &self.programs.html),
            ("programs.pdf", &self.programs.pdf),
            ("programs.copy", &self.programs.copy),
        ] {
            if program.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{field} must not be empty")));
            }
        }
        Ok(())
    }
}

/// Command-line values layered over the file config.
///
/// `None` / `false` / empty means "not given on the command line".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub exclude: Option<Vec<String>>,
    pub media: Option<Vec<String>>,
    pub pdf: bool,
    pub requires: Vec<String>,
    pub force: bool,
    pub index_refresh: Option<IndexRefresh>,
}

/// Immutable snapshot read by every stage of the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Root of the content tree.
    pub source: PathBuf,
    /// Root of the generated output tree.
    pub output: PathBuf,
    pub exclude: Vec<String>,
    pub media: Vec<String>,
    pub pdf: bool,
    pub requires: Vec<String>,
    /// Bypass the staleness check for every target.
    pub force: bool,
    pub index_refresh: IndexRefresh,
    pub programs: Programs,
}

impl BuildConfig {
    /// Freeze a file config for the given roots, with no command-line overrides.
    pub fn new(source: impl Into<PathBuf>, output: impl Into<PathBuf>, file: WikiConfig) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            exclude: file.exclude,
            media: file.media,
            pdf: file.pdf,
            requires: file.requires,
            force: false,
            index_refresh: file.index_refresh,
            programs: file.programs,
        }
    }

    /// Apply command-line overrides on top of this snapshot.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(exclude) = overrides.exclude {
            self.exclude = clean_names(exclude);
        }
        if let Some(media) = overrides.media {
            self.media = clean_names(media);
        }
        self.pdf |= overrides.pdf;
        self.requires.extend(overrides.requires);
        self.force = overrides.force;
        if let Some(policy) = overrides.index_refresh {
            self.index_refresh = policy;
        }
        self
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.iter().any(|n| n == name)
    }

    pub fn is_media(&self, name: &str) -> bool {
        self.media.iter().any(|n| n == name)
    }
}

fn clean_names(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(WikiConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `wiki.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no config file.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load the file layer: stock defaults with `wiki.toml` merged on top.
pub fn load_config(source: &Path) -> Result<WikiConfig, ConfigError> {
    let merged = match load_raw_config(source)? {
        Some(overlay) => merge_toml(stock_defaults_value(), overlay),
        None => stock_defaults_value(),
    };
    let config: WikiConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Resolve the full configuration for a build.
pub fn resolve(
    source: &Path,
    output: &Path,
    overrides: Overrides,
) -> Result<BuildConfig, ConfigError> {
    if !source.is_dir() {
        return Err(ConfigError::Validation(format!(
            "source root {} is not a directory",
            source.display()
        )));
    }
    let file = load_config(source)?;
    let config = BuildConfig::new(source, output, file).with_overrides(overrides);

    if paths::absolute(&config.output)? == paths::absolute(&config.source)? {
        return Err(ConfigError::Validation(
            "output root must differ from the source root".into(),
        ));
    }
    Ok(config)
}

/// Returns a fully commented stock `wiki.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# wiki-build configuration
# ========================
# Place this file in the root of your wiki source as `wiki.toml`.
# Every key is optional; values shown are the defaults.
# Command-line flags override anything set here.

# Entry names skipped together with everything below them.
# The output directory is always skipped, whatever its name.
exclude = ["html", ".git"]

# Directory names copied verbatim into the output tree.
media = ["img", "resources"]

# Also render a .pdf next to every .html.
pdf = false

# Extra libraries for the renderer, passed as `-r <value>` in this order.
requires = []

# When to re-render directory index pages:
#   "always"  - on every build
#   "missing" - only when the page has never been built
#   "changed" - when the directory listing changed or the page is missing
index_refresh = "changed"

[programs]
html = "asciidoctor"
pdf = "asciidoctor-pdf"
copy = "cp"
"##
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wiki_build::backend::CommandBackend;
use wiki_build::config::{self, BuildConfig, IndexRefresh, Overrides};
use wiki_build::{driver, output};

/// Shared flags for commands that walk the source tree.
#[derive(clap::Args, Clone)]
struct BuildArgs {
    /// Also render a PDF next to every HTML page
    #[arg(long)]
    pdf: bool,

    /// Comma separated entry names to skip, replacing the configured list
    #[arg(long, value_delimiter = ',')]
    exclude: Option<Vec<String>>,

    /// Comma separated directory names to copy verbatim, replacing the configured list
    #[arg(long, value_delimiter = ',')]
    media: Option<Vec<String>>,

    /// Library to load into the renderer (repeatable)
    #[arg(short = 'r', long = "require")]
    requires: Vec<String>,

    /// Render every target, fresh or not
    #[arg(long)]
    force: bool,

    /// When to rewrite and re-render generated index pages
    #[arg(long, value_enum)]
    index_refresh: Option<IndexRefresh>,

    /// Print the report as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

impl BuildArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            exclude: self.exclude.clone(),
            media: self.media.clone(),
            pdf: self.pdf,
            requires: self.requires.clone(),
            force: self.force,
            index_refresh: self.index_refresh,
        }
    }
}

#[derive(Parser)]
#[command(name = "wiki-build")]
#[command(about = "Incremental HTML builds for AsciiDoc wikis")]
#[command(long_about = "\
Incremental HTML builds for AsciiDoc wikis

Every .adoc file under the source root is rendered to .html at the same
relative path under the output root, but only when the output is missing or
older than the source. Media directories are copied across as-is, and every
directory with content gets a generated index page.

Source structure:

  wiki/
  ├── wiki.toml            # Optional settings (see gen-config)
  ├── home.adoc            # → html/home.html
  ├── _index.adoc          # Generated: listing of this directory
  ├── img/                 # Media: copied to html/img/
  └── guides/
      ├── setup.adoc       # → html/guides/setup.html
      └── _index.adoc      # → html/guides/index.html

Rendering uses asciidoctor (and asciidoctor-pdf with --pdf), which must be
on PATH.

Run 'wiki-build gen-config' to generate a documented wiki.toml.")]
#[command(version)]
struct Cli {
    /// Wiki source directory
    #[arg(long, default_value = "./", global = true)]
    path: PathBuf,

    /// Output directory
    #[arg(long, default_value = "./html", global = true)]
    out: PathBuf,

    /// Log every decision, including skipped targets
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render stale pages, copy media, and regenerate index pages
    Build(BuildArgs),
    /// Show what a build would do without writing anything
    Check(BuildArgs),
    /// Print a stock wiki.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Build(args) => {
            let config = resolve(&cli.path, &cli.out, &args)?;
            let backend = CommandBackend::new(&config.programs);
            let report = driver::build(&config, &backend)?;
            for warning in &report.warnings {
                tracing::warn!("{warning}");
            }
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_build_report(&report, &config);
            }
        }
        Command::Check(args) => {
            let config = resolve(&cli.path, &cli.out, &args)?;
            let check = driver::check(&config)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&check.report)?);
            } else {
                output::print_check_report(&check, &config);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn resolve(
    path: &std::path::Path,
    out: &std::path::Path,
    args: &BuildArgs,
) -> Result<BuildConfig, config::ConfigError> {
    let config = config::resolve(path, out, args.overrides())?;
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

/// Log to stderr so `--json` output on stdout stays machine-readable.
///
/// `RUST_LOG` takes precedence over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

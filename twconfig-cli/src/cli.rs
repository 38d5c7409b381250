use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::info;
use twconfig::{
    ContentScanConfig, ResolveOptions, json_schema, load_config, load_project_config, output,
    resolve_content,
};

#[derive(Parser, Debug)]
#[command(name = "twconfig", version, about = "Inspect utility-class CSS content-scan configs")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Where to find the config file.
#[derive(Args, Debug, Clone)]
pub struct ConfigSource {
    /// Explicit config file path (skips discovery)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Project root to discover the config in and resolve globs against
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowFormat {
    Human,
    Json,
    Js,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the loaded config descriptor
    Show {
        #[command(flatten)]
        source: ConfigSource,
        /// Output format
        #[arg(long, value_enum, default_value_t = ShowFormat::Human)]
        format: ShowFormat,
    },
    /// Validate the config; exits non-zero if it is missing or malformed
    Check {
        #[command(flatten)]
        source: ConfigSource,
    },
    /// List the files matched by the content globs
    Files {
        #[command(flatten)]
        source: ConfigSource,
        /// Emit the resolution as JSON
        #[arg(long)]
        json: bool,
        /// Stop after this many files
        #[arg(long, default_value_t = 100_000)]
        max_files: usize,
        /// Maximum directory depth below each walk root
        #[arg(long, default_value_t = 64)]
        max_depth: usize,
        /// Follow symbolic links while walking
        #[arg(long)]
        follow_links: bool,
    },
    /// Print the JSON Schema of the config document
    Schema,
}

/// Parse arguments, run the command, and return the process exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    crate::logging::init(cli.verbose);
    execute(cli.command, &mut std::io::stdout().lock())
}

fn execute(command: Command, out: &mut dyn Write) -> Result<i32> {
    match command {
        Command::Show { source, format } => {
            let (path, config) = load(&source)?;
            match format {
                ShowFormat::Human => output::write_config_human(&config, &path, out)?,
                ShowFormat::Json => write!(out, "{}", config.to_json_pretty()?)?,
                ShowFormat::Js => write!(out, "{}", config.to_js_module()?)?,
            }
            Ok(0)
        }
        Command::Check { source } => check(&source, out),
        Command::Files {
            source,
            json,
            max_files,
            max_depth,
            follow_links,
        } => {
            let (path, config) = load(&source)?;
            let mut options = ResolveOptions::default();
            options.max_files = max_files;
            options.max_depth = max_depth;
            options.follow_links = follow_links;

            let base = config.base_dir(&path, &source.root);
            let resolution = resolve_content(&config, &base, &options);
            if json {
                output::write_resolution_json(&resolution, out)?;
            } else {
                output::write_resolution_human(&resolution, out)?;
            }
            Ok(i32::from(!resolution.ok()))
        }
        Command::Schema => {
            let schema = serde_json::to_string_pretty(&json_schema())?;
            writeln!(out, "{schema}")?;
            Ok(0)
        }
    }
}

fn load(source: &ConfigSource) -> Result<(PathBuf, ContentScanConfig)> {
    let (path, config) = match &source.config {
        Some(path) => (path.clone(), load_config(path)?),
        None => load_project_config(&source.root)
            .with_context(|| format!("loading config from {}", source.root.display()))?,
    };
    info!(path = %path.display(), globs = config.content_globs().len(), "config loaded");
    Ok((path, config))
}

fn check(source: &ConfigSource, out: &mut dyn Write) -> Result<i32> {
    let loaded = match &source.config {
        Some(path) => load_config(path).map(|c| (path.clone(), c)),
        None => load_project_config(&source.root),
    };
    match loaded {
        Ok((path, config)) => {
            writeln!(
                out,
                "{} {}: {} content glob(s), {} theme extension(s), {} plugin(s)",
                "\u{2713}".green(),
                display(&path),
                config.content_globs().len(),
                config.theme_extensions().len(),
                config.plugins.len()
            )?;
            Ok(0)
        }
        Err(e) => {
            writeln!(out, "{} {e}", "\u{2717}".red())?;
            Ok(1)
        }
    }
}

fn display(path: &Path) -> String {
    path.strip_prefix(".")
        .unwrap_or(path)
        .display()
        .to_string()
}

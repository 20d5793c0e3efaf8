//! xref CLI - Command-line loader for quality cross-reference data
//!
//! Builds an in-memory graph linking roots and serials to functions,
//! failures, articles and causes from two semicolon-delimited exports.

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use xref_core::{MalformedPolicy, DEFAULT_DELIMITER};

mod commands;
mod config;
mod output;

use commands::load::{self, LoadOptions};
use config::XrefConfig;
use output::{OutputConfig, OutputFormat};

/// Cross-reference quality-tracking exports.
#[derive(Parser)]
#[command(name = "xref")]
#[command(author, version)]
#[command(about = "Cross-reference function/failure and article/cause exports")]
#[command(propagate_version = true)]
#[command(after_help = "Examples:
  xref load                           Load ./data/FP_WIN.csv and ./data/AC.csv
  xref load --fp fp.csv --ac ac.csv   Load explicit files
  xref --format tree load             Show the root/serial hierarchy")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format (overrides config default)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Show detailed version information
    #[arg(long = "version-verbose")]
    version_verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load both exports into one graph and print a summary
    #[command(visible_alias = "l")]
    Load {
        /// Function/failure export (default: config, then ./data/FP_WIN.csv)
        #[arg(long)]
        fp: Option<PathBuf>,

        /// Article/cause export (default: config, then ./data/AC.csv)
        #[arg(long)]
        ac: Option<PathBuf>,

        /// What to do with a malformed record: stop, skip, fail
        #[arg(long)]
        on_malformed: Option<MalformedPolicy>,

        /// Field separator (default: ';')
        #[arg(short, long)]
        delimiter: Option<char>,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

/// Print verbose version information
fn print_verbose_version() {
    use colored::Colorize;

    let cli_version = env!("CARGO_PKG_VERSION");
    let platform = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);

    println!("xref {}", cli_version);
    println!("  {:<11} {}", "xref-cli:".cyan(), cli_version);
    println!("  {:<11} {}", "xref-core:".cyan(), cli_version);
    println!("  {:<11} {}", "Platform:".cyan(), platform);
}

/// Resolve the malformed-row policy: CLI flag > config > default.
fn resolve_policy(flag: Option<MalformedPolicy>, config: &XrefConfig) -> MalformedPolicy {
    flag.or_else(|| {
        config.on_malformed().and_then(|value| match value.parse::<MalformedPolicy>() {
            Ok(policy) => Some(policy),
            Err(e) => {
                tracing::warn!("Ignoring [ingest].on_malformed: {}", e);
                None
            }
        })
    })
    .unwrap_or_default()
}

/// Parse the configured output format, warning on unknown values.
fn resolve_format(configured: Option<&str>) -> OutputFormat {
    configured
        .and_then(|value| match value.parse::<OutputFormat>() {
            Ok(format) => Some(format),
            Err(e) => {
                tracing::warn!("Ignoring [output].format: {}", e);
                None
            }
        })
        .unwrap_or(OutputFormat::Table)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version_verbose {
        print_verbose_version();
        return Ok(());
    }

    setup_logging(cli.verbose, cli.quiet);

    let config = XrefConfig::load(std::path::Path::new("."));

    // Resolve output format: CLI flag > config default > Table
    let format = cli
        .format
        .unwrap_or_else(|| resolve_format(config.default_format()));
    let output = OutputConfig::auto_detect(format, config.use_color());
    colored::control::set_override(output.use_colors());

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            let _ = Cli::command().print_help();
            println!();
            return Ok(());
        }
    };

    match command {
        Commands::Load {
            fp,
            ac,
            on_malformed,
            delimiter,
        } => {
            let options = LoadOptions {
                fp_file: fp.unwrap_or_else(|| PathBuf::from(config.fp_file())),
                ac_file: ac.unwrap_or_else(|| PathBuf::from(config.ac_file())),
                delimiter: delimiter
                    .or(config.delimiter())
                    .unwrap_or(DEFAULT_DELIMITER),
                policy: resolve_policy(on_malformed, &config),
            };
            load::run(&options, &output)
        }
    }
}

//! Load command - build the cross-reference graph from both exports
//!
//! Reads the FP (function/failure) source first, then the AC
//! (article/cause) source, into a single environment and prints a summary.

use crate::output::{CsvOutput, NodeKind, OutputConfig, Outputter, TableOutput, TreeNode, TreeOutput};
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use xref_core::{Environment, GraphStats, LoadReport, MalformedPolicy, RootSummary, RowKind, RowReader};

/// Resolved settings for one load run.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub fp_file: PathBuf,
    pub ac_file: PathBuf,
    pub delimiter: char,
    pub policy: MalformedPolicy,
}

/// Report for one source file.
#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub path: String,
    #[serde(flatten)]
    pub report: LoadReport,
}

/// Everything printed after a load.
#[derive(Debug, Clone, Serialize)]
pub struct LoadSummary {
    pub sources: Vec<SourceSummary>,
    pub stats: GraphStats,
    pub roots: Vec<RootSummary>,
    /// Time taken to load (in milliseconds)
    pub duration_ms: u64,
}

impl LoadSummary {
    fn new(env: &Environment, sources: Vec<SourceSummary>, duration_ms: u64) -> Self {
        Self {
            sources,
            stats: env.stats(),
            roots: env.root_summaries(),
            duration_ms,
        }
    }

    fn serial_rows(&self) -> Vec<Vec<String>> {
        self.roots
            .iter()
            .flat_map(|root| {
                root.serials.iter().map(move |serial| {
                    vec![
                        root.name.clone(),
                        serial.name.clone(),
                        serial.functions.to_string(),
                        serial.failures.to_string(),
                        serial.articles.to_string(),
                        serial.causes.to_string(),
                    ]
                })
            })
            .collect()
    }
}

const SERIAL_HEADERS: [&str; 6] = ["root", "serial", "functions", "failures", "articles", "causes"];

impl Outputter for LoadSummary {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut lines = Vec::new();

        let all_complete = self.sources.iter().all(|s| s.report.completed());
        if all_complete {
            lines.push(format!("{}", "xref: Loaded".green().bold()));
        } else {
            lines.push(format!("{}", "xref: Loaded with stops".yellow().bold()));
        }

        for source in &self.sources {
            let report = &source.report;
            let mut line = format!(
                "  {:<3} {} ({} rows",
                report.kind.as_str().to_uppercase().cyan(),
                source.path,
                report.rows_ingested
            );
            if report.rows_skipped > 0 {
                line.push_str(&format!(", {} skipped", report.rows_skipped));
            }
            line.push(')');
            lines.push(line);

            if let Some(stop) = &report.stopped_at {
                let at = stop
                    .line
                    .map(|l| format!("line {}", l))
                    .unwrap_or_else(|| "read error".to_string());
                lines.push(format!(
                    "      {} {}: {}",
                    "stopped at".yellow(),
                    at,
                    stop.reason
                ));
            }
        }

        lines.push(String::new());
        let stats = &self.stats;
        let pairs = [
            ("Roots", stats.roots.to_string()),
            ("Serials", stats.serials.to_string()),
            ("Functions", stats.functions.to_string()),
            ("Failures", stats.failures.to_string()),
            ("Articles", stats.articles.to_string()),
            ("Causes", stats.causes.to_string()),
            ("Function/failure links", stats.function_failure_links.to_string()),
            ("Article/cause links", stats.article_cause_links.to_string()),
        ];
        lines.push(TableOutput::format_key_value(&pairs, config));

        if !self.roots.is_empty() {
            lines.push(String::new());
            lines.push(TableOutput::from_rows(&SERIAL_HEADERS, &self.serial_rows(), config));
        }

        lines.push(format!("\n{}", format!("({} ms)", self.duration_ms).dimmed()));

        lines.join("\n")
    }

    fn to_csv(&self, _config: &OutputConfig) -> String {
        CsvOutput::from_rows(&SERIAL_HEADERS, &self.serial_rows())
    }

    fn to_tree(&self, config: &OutputConfig) -> String {
        let roots: Vec<TreeNode> = self
            .roots
            .iter()
            .map(|root| {
                let serials = root
                    .serials
                    .iter()
                    .map(|serial| {
                        TreeNode::new(&serial.name, NodeKind::Serial).with_suffix(format!(
                            "({} functions, {} failures, {} articles, {} causes)",
                            serial.functions, serial.failures, serial.articles, serial.causes
                        ))
                    })
                    .collect();
                TreeNode::new(&root.name, NodeKind::Root)
                    .with_suffix(plural(root.serials.len(), "serial"))
                    .with_children(serials)
            })
            .collect();

        TreeOutput::from_nodes("xref", &roots, config)
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("(1 {})", noun)
    } else {
        format!("({} {}s)", count, noun)
    }
}

/// Open one source and feed it into `env`.
fn load_source(
    env: &mut Environment,
    kind: RowKind,
    path: &Path,
    options: &LoadOptions,
) -> Result<SourceSummary> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} source {}", kind, path.display()))?;
    let reader = RowReader::new(BufReader::new(file)).with_delimiter(options.delimiter)?;

    info!("Loading {} rows from {}", kind, path.display());
    let report = match kind {
        RowKind::Fp => env.load_fp(reader, options.policy),
        RowKind::Ac => env.load_ac(reader, options.policy),
    }
    .with_context(|| format!("Failed to load {}", path.display()))?;

    Ok(SourceSummary {
        path: path.display().to_string(),
        report,
    })
}

/// Run the load command.
pub fn run(options: &LoadOptions, output: &OutputConfig) -> Result<()> {
    let start = Instant::now();
    let mut env = Environment::new();

    let fp = load_source(&mut env, RowKind::Fp, &options.fp_file, options)?;
    let ac = load_source(&mut env, RowKind::Ac, &options.ac_file, options)?;

    let summary = LoadSummary::new(&env, vec![fp, ac], start.elapsed().as_millis() as u64);
    summary.output(output);
    Ok(())
}

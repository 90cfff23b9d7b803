// SPDX-License-Identifier: PMPL-1.0-or-later
//! Tagbot CLI - PDF Accessibility Analyzer

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tagbot::config::{self, Config};
use tagbot::remediation::RemediationPlan;
use tagbot::report::{render, render_batch, OutputFormat};
use tagbot::{scanner, verify, Analyzer, Taxonomy};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Classify WCAG accessibility issues in extracted PDF content
#[derive(Parser)]
#[command(name = "tagbot")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML or YAML)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Font size (pt) above which text is a heading candidate
    #[arg(long, global = true)]
    heading_threshold: Option<f64>,

    /// Reading-order tolerance (pt)
    #[arg(long, global = true)]
    tolerance: Option<f64>,

    /// Also run the advisory checks (contrast, metadata)
    #[arg(long, global = true)]
    advisory: bool,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one extraction file
    Analyze {
        /// Extraction JSON produced by the extractor
        file: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Analyze every extraction file under a directory
    Check {
        /// Directory to scan
        dir: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Generate a SARIF report for one extraction file
    Report {
        /// Extraction JSON produced by the extractor
        file: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Produce the remediation plan for one extraction file
    Plan {
        /// Extraction JSON produced by the extractor
        file: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Compare extractions taken before and after remediation
    Verify {
        /// Extraction of the original document
        before: PathBuf,

        /// Extraction of the remediated document
        after: PathBuf,

        /// Print the full comparison as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the issue taxonomy
    Taxonomy {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default configuration file
    InitConfig {
        /// Destination; `.toml` selects TOML, anything else YAML
        path: PathBuf,
    },
}

/// Output format CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
    /// SARIF for IDE/CI
    Sarif,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Sarif => OutputFormat::Sarif,
        }
    }
}

fn init_logging(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("tagbot=debug")
    } else {
        EnvFilter::try_new(format!("tagbot={}", level)).unwrap_or_else(|_| EnvFilter::new("tagbot=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config file and apply command-line overrides
fn load_settings(cli: &Cli) -> anyhow::Result<Config> {
    let path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let mut settings = config::load_config(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    if let Some(threshold) = cli.heading_threshold {
        settings.analysis.heading_threshold = threshold;
    }
    if let Some(tolerance) = cli.tolerance {
        settings.analysis.reading_order_tolerance = tolerance;
    }
    if cli.advisory {
        settings.analysis.advisory_checks = true;
    }

    Ok(settings)
}

fn analyze_file(analyzer: &Analyzer, file: &Path) -> anyhow::Result<tagbot::Report> {
    scanner::scan_file(file, analyzer).with_context(|| format!("Failed to analyze {}", file.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    init_logging(cli.verbose, &settings.log.level);
    debug!(?settings, "Effective configuration");

    match &cli.command {
        Commands::Analyze { file, format, output } => {
            let analyzer = Analyzer::new(settings.analysis.clone())?;
            let report = analyze_file(&analyzer, file)?;
            write_output(&render(&report, (*format).into()), output.as_deref())?;

            if report.has_critical() {
                std::process::exit(1);
            }
        }

        Commands::Check { dir, format, output } => {
            let analyzer = Analyzer::new(settings.analysis.clone())?;
            let batch = scanner::scan_directory(dir, &analyzer)?;
            write_output(&render_batch(&batch, (*format).into()), output.as_deref())?;

            if batch.has_critical() {
                std::process::exit(1);
            }
        }

        Commands::Report { file, output } => {
            let analyzer = Analyzer::new(settings.analysis.clone())?;
            let report = analyze_file(&analyzer, file)?;
            write_output(&render(&report, OutputFormat::Sarif), output.as_deref())?;
        }

        Commands::Plan { file, output } => {
            let analyzer = Analyzer::new(settings.analysis.clone())?;
            let report = analyze_file(&analyzer, file)?;
            let plan = RemediationPlan::from_report(&report);
            write_output(&plan.to_json(), output.as_deref())?;
        }

        Commands::Verify { before, after, json } => {
            let analyzer = Analyzer::new(settings.analysis.clone())?;
            let before_report = analyze_file(&analyzer, before)?;
            let after_report = analyze_file(&analyzer, after)?;
            let summary = verify::compare(&before_report, &after_report);

            if *json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Issues: {} -> {}", summary.before_total, summary.after_total);
                println!("Critical: {} -> {}", summary.before_critical, summary.after_critical);
                println!("Resolved: {}", summary.resolved.len());
                println!("Remaining: {}", summary.remaining.len());
                println!("Introduced: {}", summary.introduced.len());
                for issue in &summary.introduced {
                    println!("  NEW [{}] {}: {}", issue.location, issue.kind, issue.message);
                }
                println!(
                    "RESULT: {}",
                    if summary.improved() { "IMPROVED" } else { "NOT IMPROVED" }
                );
            }
        }

        Commands::Taxonomy { json } => {
            let taxonomy = Taxonomy::standard();
            if *json {
                let entries: Vec<_> = taxonomy.entries().collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                println!("Issue taxonomy {}", taxonomy.version());
                for entry in taxonomy.entries() {
                    println!(
                        "  {:<24} {:<9} WCAG {:<14} auto-fixable: {}",
                        entry.kind.id(),
                        entry.severity,
                        entry.wcag,
                        if entry.auto_fixable { "yes" } else { "no" }
                    );
                }
            }
        }

        Commands::InitConfig { path } => {
            config::write_default_config(path)
                .with_context(|| format!("Failed to write config to {}", path.display()))?;
            eprintln!("Default configuration written to {}", path.display());
        }
    }

    Ok(())
}

/// Write output to file or stdout
fn write_output(content: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            eprintln!("Report written to {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

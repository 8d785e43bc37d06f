//! CLI binary for winnower.
//!
//! A thin shim over the library crate that maps CLI flags to
//! [`WinnowerConfig`] and [`Processor`] calls and prints the batch
//! summary. Per-paper failures never change the exit code; only fatal
//! errors (bad arguments, malformed configuration) and user interruption
//! exit non-zero.

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use winnower::{Processor, WinnowerConfig};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Single paper
  winnower paper.pdf

  # From arXiv, by URL or bare identifier
  winnower https://arxiv.org/abs/2301.00001
  winnower 2301.00001

  # A whole directory, recursively, into a chosen output root
  winnower /path/to/papers/ --recursive -o summaries/

  # Use Anthropic instead of OpenAI
  winnower paper.pdf --model anthropic

OUTPUT LAYOUT:
  <output>/papers/     originals, copied verbatim (local inputs only)
  <output>/extracted/  <title>_extracted.md  normalized text
  <output>/summaries/  <title>_summary.md    technical summary

CONFIGURATION:
  ~/.winnower/config.json (or --config PATH) with optional keys
  openai_model, anthropic_model, max_tokens, temperature, verbose.

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY            OpenAI API key
  ANTHROPIC_API_KEY         Anthropic API key
  WINNOWER_OPENAI_MODEL     Override the OpenAI model id
  WINNOWER_ANTHROPIC_MODEL  Override the Anthropic model id
  WINNOWER_MAX_TOKENS       Override max_tokens (integer)
  WINNOWER_TEMPERATURE      Override temperature (float, 0..=1)
"#;

/// Extract core technical details from research papers.
#[derive(Parser, Debug)]
#[command(
    name = "winnower",
    version,
    about = "Extract core technical details from research papers",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Paper input: file path, directory, URL, or arXiv ID.
    input: String,

    /// Output directory (default: current directory).
    #[arg(short, long, env = "WINNOWER_OUTPUT", default_value = ".")]
    output: PathBuf,

    /// Process directory recursively.
    #[arg(short, long)]
    recursive: bool,

    /// Configuration file path (default: ~/.winnower/config.json).
    #[arg(long)]
    config: Option<PathBuf>,

    /// AI model provider.
    #[arg(long, value_enum, default_value = "openai")]
    model: ProviderArg,

    /// Enable verbose output (DEBUG-level logs, full per-paper error chains).
    #[arg(short, long, env = "WINNOWER_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ProviderArg {
    Openai,
    Anthropic,
}

impl ProviderArg {
    fn as_str(self) -> &'static str {
        match self {
            ProviderArg::Openai => "openai",
            ProviderArg::Anthropic => "anthropic",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Config + processor ───────────────────────────────────────────────
    let mut config =
        WinnowerConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.verbose = config.verbose || cli.verbose;

    let processor = Processor::new(config, cli.model.as_str())
        .context("Failed to initialize the model provider")?;

    // ── Run, with Ctrl-C reported distinctly ─────────────────────────────
    let report = tokio::select! {
        result = processor.process(&cli.input, &cli.output, cli.recursive) => {
            result.context("Processing failed")?
        }
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\n{}", red("Operation cancelled by user."));
            std::process::exit(1);
        }
    };

    // ── Batch summary ────────────────────────────────────────────────────
    if !cli.quiet {
        let total = report.processed + report.failed;
        if total == 0 {
            eprintln!("{} no papers found in {}", cyan("∅"), bold(&cli.input));
        } else if report.failed == 0 {
            eprintln!(
                "{} {} paper(s) processed  →  {}",
                green("✔"),
                bold(&report.processed.to_string()),
                dim(&cli.output.display().to_string()),
            );
        } else {
            eprintln!(
                "{} {}/{} paper(s) processed  ({} failed)",
                if report.processed == 0 { red("✘") } else { cyan("⚠") },
                bold(&report.processed.to_string()),
                total,
                red(&report.failed.to_string()),
            );
            for failure in &report.failures {
                eprintln!("  {} {}  {}", red("✗"), failure.source, dim(&failure.error));
            }
        }
    }

    // Per-paper failures are reported above but do not fail the run.
    Ok(())
}

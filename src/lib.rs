//! # winnower
//!
//! Extract the core technical details from research papers using LLMs.
//!
//! ## Why this crate?
//!
//! Research papers bury their technical substance under marketing
//! language, benchmark tables, related-work surveys, and appendices.
//! winnower ingests a paper from any common source, strips the chaff, and
//! asks an LLM for exactly the parts a re-implementer needs: methods,
//! implementation details, innovations, parameters, and experimental
//! setup.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input (file / directory / URL / arXiv id)
//!  │
//!  ├─ 1. Parse       resolve the source, decode PDF/text, derive metadata
//!  ├─ 2. Preprocess  collapse whitespace, strip references/appendices, cap size
//!  ├─ 3. Extract     one LLM call per paper (openai or anthropic)
//!  ├─ 4. Format      render a markdown summary document
//!  └─ 5. Output      papers/ + extracted/ + summaries/ under the output root
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use winnower::{Processor, WinnowerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads OPENAI_API_KEY from the environment at call time.
//!     let config = WinnowerConfig::load(None)?;
//!     let processor = Processor::new(config, "openai")?;
//!     let report = processor
//!         .process("2301.00001", std::path::Path::new("out"), false)
//!         .await?;
//!     eprintln!("{} processed, {} failed", report.processed, report.failed);
//!     Ok(())
//! }
//! ```
//!
//! ## Failure policy
//!
//! One bad paper never aborts a batch: parse and I/O failures are logged
//! and counted, and provider failures are embedded as text in the summary
//! itself. Only configuration and argument errors are fatal.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `winnower` binary (clap + anyhow + tracing-subscriber + dotenv) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! winnower = { version = "0.2", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod filename;
pub mod format;
pub mod paper;
pub mod pipeline;
pub mod processor;
pub mod prompts;
pub mod provider;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::WinnowerConfig;
pub use error::WinnowerError;
pub use filename::safe_filename;
pub use format::format_summary;
pub use paper::{ExtractionResult, PaperRecord, PaperSource};
pub use pipeline::extract::{TechnicalExtractor, EXTRACTION_ERROR_PREFIX};
pub use pipeline::parser::{arxiv_id, is_url, PaperParser};
pub use pipeline::preprocess::{preprocess, truncate_content};
pub use processor::{BatchFailure, BatchReport, Processor};
pub use provider::{create_provider, AnthropicProvider, LlmProvider, OpenAiProvider};

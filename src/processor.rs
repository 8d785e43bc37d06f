//! Batch orchestration: discovery, per-paper pipeline, output layout.
//!
//! The processor wires parser, extractor, and formatter together and owns
//! the one batch-level policy: **per-paper isolation**. Every paper's
//! pipeline runs inside its own fallible step; a failure is logged,
//! recorded in the [`BatchReport`], and the loop moves on. Only an empty
//! source list or a failure to create the output tree stops a run early.
//!
//! Papers are processed strictly one at a time in discovery order. The
//! output tree has three sibling directories under the output root:
//!
//! ```text
//! <output_dir>/
//!   papers/     original files, copied verbatim (local inputs only)
//!   extracted/  <safe_title>_extracted.md   normalized text
//!   summaries/  <safe_title>_summary.md     rendered extraction result
//! ```
//!
//! Entries are keyed by the title-derived safe filename, so re-processing
//! the same title overwrites prior output (last write wins).

use crate::config::WinnowerConfig;
use crate::error::WinnowerError;
use crate::filename::safe_filename;
use crate::format::format_summary;
use crate::pipeline::extract::TechnicalExtractor;
use crate::pipeline::parser::{has_recognized_extension, PaperParser};
use crate::pipeline::preprocess::preprocess;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Outcome of one batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Papers that produced a summary file.
    pub processed: usize,
    /// Papers abandoned after an error.
    pub failed: usize,
    /// One entry per failed paper.
    pub failures: Vec<BatchFailure>,
}

/// A single per-paper failure, kept for the end-of-run report.
#[derive(Debug)]
pub struct BatchFailure {
    /// The source string as it appeared in the batch.
    pub source: String,
    /// Rendered error message.
    pub error: String,
}

/// The three sibling output directories.
struct OutputLayout {
    papers: PathBuf,
    extracted: PathBuf,
    summaries: PathBuf,
}

impl OutputLayout {
    async fn create(root: &Path) -> Result<Self, WinnowerError> {
        let layout = Self {
            papers: root.join("papers"),
            extracted: root.join("extracted"),
            summaries: root.join("summaries"),
        };
        for dir in [&layout.papers, &layout.extracted, &layout.summaries] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| WinnowerError::OutputWrite {
                    path: dir.clone(),
                    source: e,
                })?;
        }
        Ok(layout)
    }
}

/// Main processor: turns an input source into summary documents.
pub struct Processor {
    parser: PaperParser,
    extractor: TechnicalExtractor,
    config: WinnowerConfig,
}

impl Processor {
    /// Build a processor for the named provider.
    pub fn new(config: WinnowerConfig, provider_name: &str) -> Result<Self, WinnowerError> {
        let extractor = TechnicalExtractor::new(provider_name, &config)?;
        Ok(Self {
            parser: PaperParser::new(),
            extractor,
            config,
        })
    }

    /// Process all papers reachable from `input_source`.
    ///
    /// A file maps to a one-element batch, a directory to its listing
    /// (top-level unless `recursive`), and anything else (URL, arXiv id)
    /// is passed through for the parser to resolve. When nothing is found
    /// the run ends without creating any output directories.
    pub async fn process(
        &self,
        input_source: &str,
        output_dir: &Path,
        recursive: bool,
    ) -> Result<BatchReport, WinnowerError> {
        let sources = self.collect_sources(input_source, recursive)?;
        let mut report = BatchReport::default();

        if sources.is_empty() {
            info!("No papers found to process.");
            return Ok(report);
        }

        let layout = OutputLayout::create(output_dir).await?;

        for source in &sources {
            match self.process_one(source, &layout).await {
                Ok(summary_path) => {
                    info!("Generated summary: {}", summary_path.display());
                    report.processed += 1;
                }
                Err(e) => {
                    if self.config.verbose {
                        error!("Error processing {source}: {e:?}");
                    } else {
                        error!("Error processing {source}: {e}");
                    }
                    report.failed += 1;
                    report.failures.push(BatchFailure {
                        source: source.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }

    /// Resolve the input into a list of per-paper source strings.
    fn collect_sources(
        &self,
        input_source: &str,
        recursive: bool,
    ) -> Result<Vec<String>, WinnowerError> {
        let path = Path::new(input_source);

        if path.is_file() {
            return Ok(vec![input_source.to_string()]);
        }
        if path.is_dir() {
            let files = self.parser.find_papers_in_directory(path, recursive)?;
            return Ok(files
                .into_iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect());
        }
        // URL or identifier: the parser resolves it per paper.
        Ok(vec![input_source.to_string()])
    }

    /// Run the full pipeline for one source and return the summary path.
    async fn process_one(
        &self,
        source: &str,
        layout: &OutputLayout,
    ) -> Result<PathBuf, WinnowerError> {
        info!("Processing: {source}");
        let record = self.parser.parse(source).await?;

        // Keep the original next to the derived artifacts for local inputs.
        let source_path = Path::new(source);
        if source_path.is_file() && has_recognized_extension(source_path) {
            if let Some(name) = source_path.file_name() {
                let dest = layout.papers.join(name);
                tokio::fs::copy(source_path, &dest).await.map_err(|e| {
                    WinnowerError::OutputWrite {
                        path: dest.clone(),
                        source: e,
                    }
                })?;
                debug!("Saved original paper: {}", dest.display());
            }
        }

        let extracted_path = layout
            .extracted
            .join(format!("{}.md", safe_filename(&record.title, Some("extracted"))));
        write_doc(&extracted_path, &preprocess(&record.content)).await?;
        debug!("Saved extracted text: {}", extracted_path.display());

        let result = self.extractor.extract(&record).await;

        let summary_path = layout
            .summaries
            .join(format!("{}.md", safe_filename(&record.title, Some("summary"))));
        write_doc(&summary_path, &format_summary(&result)).await?;

        Ok(summary_path)
    }
}

async fn write_doc(path: &Path, body: &str) -> Result<(), WinnowerError> {
    tokio::fs::write(path, body)
        .await
        .map_err(|e| WinnowerError::OutputWrite {
            path: path.to_path_buf(),
            source: e,
        })
}

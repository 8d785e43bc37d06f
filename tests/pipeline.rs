//! End-to-end pipeline tests for winnower.
//!
//! These tests run entirely offline: the LLM provider is replaced through
//! the pre-built-provider hook in [`WinnowerConfig`], and all paper
//! sources are local files inside temp directories. No API key or network
//! access is required.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use winnower::{
    safe_filename, LlmProvider, Processor, WinnowerConfig, WinnowerError, EXTRACTION_ERROR_PREFIX,
};

// ── Test providers ───────────────────────────────────────────────────────

/// Always returns the same string, like a very confident model.
#[derive(Debug)]
struct FixedProvider(&'static str);

#[async_trait]
impl LlmProvider for FixedProvider {
    async fn generate(&self, _prompt: &str) -> Result<String, WinnowerError> {
        Ok(self.0.to_string())
    }
    fn name(&self) -> &str {
        "fixed"
    }
}

/// Always fails, like a provider with a revoked key.
#[derive(Debug)]
struct FailingProvider;

#[async_trait]
impl LlmProvider for FailingProvider {
    async fn generate(&self, _prompt: &str) -> Result<String, WinnowerError> {
        Err(WinnowerError::Provider {
            provider: "failing".into(),
            message: "HTTP 401: invalid key".into(),
        })
    }
    fn name(&self) -> &str {
        "failing"
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────

fn processor_with(provider: Arc<dyn LlmProvider>) -> Processor {
    let config = WinnowerConfig {
        provider: Some(provider),
        ..WinnowerConfig::default()
    };
    Processor::new(config, "openai").expect("processor construction")
}

fn write_paper(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).expect("write test paper");
    path
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

// ── Single-file scenarios ────────────────────────────────────────────────

#[tokio::test]
async fn single_text_file_produces_all_artifacts() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let paper = write_paper(
        input.path(),
        "my_paper.txt",
        "My Paper!!\n\nSome technical content about gradient descent.",
    );

    let processor = processor_with(Arc::new(FixedProvider("THE EXTRACTED METHODS")));
    let report = processor
        .process(paper.to_str().unwrap(), output.path(), false)
        .await
        .unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.failed, 0);

    // Original copied verbatim.
    let copied = output.path().join("papers").join("my_paper.txt");
    assert!(copied.exists(), "original should be copied into papers/");
    assert_eq!(read(&copied), read(&paper));

    // Extracted text is the preprocessed input.
    let extracted = output
        .path()
        .join("extracted")
        .join("My_Paper_extracted.md");
    assert_eq!(
        read(&extracted),
        "My Paper!! Some technical content about gradient descent."
    );

    // Summary carries the provider's output under the title heading.
    let summary = output.path().join("summaries").join("My_Paper_summary.md");
    let body = read(&summary);
    assert!(body.starts_with("# My Paper!!\n"));
    assert!(body.contains("THE EXTRACTED METHODS"));
}

#[tokio::test]
async fn provider_failure_still_produces_a_summary() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let paper = write_paper(input.path(), "note.txt", "Resilient Paper\n\nBody.");

    let processor = processor_with(Arc::new(FailingProvider));
    let report = processor
        .process(paper.to_str().unwrap(), output.path(), false)
        .await
        .unwrap();

    // The provider failure is embedded, not raised: the paper counts as
    // processed and its summary exists with the error text inside.
    assert_eq!(report.processed, 1);
    assert_eq!(report.failed, 0);

    let summary = output
        .path()
        .join("summaries")
        .join("Resilient_Paper_summary.md");
    let body = read(&summary);
    assert!(body.contains(EXTRACTION_ERROR_PREFIX));
    assert!(body.contains("HTTP 401"));
}

// ── Directory scenarios ──────────────────────────────────────────────────

#[tokio::test]
async fn non_recursive_directory_skips_nested_files() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    write_paper(input.path(), "first.txt", "First Paper\n\nBody one.");
    write_paper(input.path(), "second.md", "# Second Paper\n\nBody two.");
    let nested = input.path().join("nested");
    std::fs::create_dir(&nested).unwrap();
    write_paper(&nested, "third.txt", "Third Paper\n\nBody three.");

    let processor = processor_with(Arc::new(FixedProvider("ok")));
    let report = processor
        .process(input.path().to_str().unwrap(), output.path(), false)
        .await
        .unwrap();

    assert_eq!(report.processed, 2, "only top-level files are in scope");
    assert!(output
        .path()
        .join("summaries")
        .join("First_Paper_summary.md")
        .exists());
    assert!(output
        .path()
        .join("summaries")
        .join("Second_Paper_summary.md")
        .exists());
    assert!(!output
        .path()
        .join("summaries")
        .join("Third_Paper_summary.md")
        .exists());
}

#[tokio::test]
async fn recursive_directory_includes_nested_files() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    write_paper(input.path(), "first.txt", "First Paper\n\nBody one.");
    let nested = input.path().join("nested");
    std::fs::create_dir(&nested).unwrap();
    write_paper(&nested, "third.txt", "Third Paper\n\nBody three.");

    let processor = processor_with(Arc::new(FixedProvider("ok")));
    let report = processor
        .process(input.path().to_str().unwrap(), output.path(), true)
        .await
        .unwrap();

    assert_eq!(report.processed, 2);
    assert!(output
        .path()
        .join("summaries")
        .join("Third_Paper_summary.md")
        .exists());
}

#[tokio::test]
async fn one_bad_paper_does_not_abort_the_batch() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    write_paper(input.path(), "good_a.txt", "Good Paper A\n\nBody.");
    write_paper(input.path(), "good_b.txt", "Good Paper B\n\nBody.");
    // Garbage bytes with a .pdf extension: decodes as neither text layer
    // nor anything else.
    write_paper(input.path(), "broken.pdf", "this is not a pdf at all");

    let processor = processor_with(Arc::new(FixedProvider("ok")));
    let report = processor
        .process(input.path().to_str().unwrap(), output.path(), false)
        .await
        .unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].source.ends_with("broken.pdf"));

    assert!(output
        .path()
        .join("summaries")
        .join("Good_Paper_A_summary.md")
        .exists());
    assert!(output
        .path()
        .join("summaries")
        .join("Good_Paper_B_summary.md")
        .exists());
}

#[tokio::test]
async fn empty_directory_reports_zero_and_writes_nothing() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let processor = processor_with(Arc::new(FixedProvider("ok")));
    let report = processor
        .process(input.path().to_str().unwrap(), output.path(), true)
        .await
        .unwrap();

    assert_eq!(report.processed + report.failed, 0);
    assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
}

// ── Filename-safety scenarios ────────────────────────────────────────────

#[tokio::test]
async fn reserved_device_name_title_is_prefixed() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let paper = write_paper(input.path(), "con_paper.txt", "CON\n\nDevice-named paper.");

    let processor = processor_with(Arc::new(FixedProvider("ok")));
    processor
        .process(paper.to_str().unwrap(), output.path(), false)
        .await
        .unwrap();

    assert_eq!(safe_filename("CON", None), "paper_CON");
    assert!(output
        .path()
        .join("summaries")
        .join("paper_CON_summary.md")
        .exists());
}

#[tokio::test]
async fn traversal_title_cannot_escape_the_output_tree() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let paper = write_paper(
        input.path(),
        "evil.txt",
        "../../etc/passwd\n\nNice try.",
    );

    let name = safe_filename("../../etc/passwd", None);
    assert!(!name.contains('/'));
    assert!(!name.contains(".."));

    let processor = processor_with(Arc::new(FixedProvider("ok")));
    let report = processor
        .process(paper.to_str().unwrap(), output.path(), false)
        .await
        .unwrap();
    assert_eq!(report.processed, 1);

    // Every artifact stays inside the three output directories.
    let summaries: Vec<_> = std::fs::read_dir(output.path().join("summaries"))
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(summaries.len(), 1);
    assert!(!summaries[0].contains(".."));
    assert!(!output.path().join("etc").exists());
}

// ── Re-processing ────────────────────────────────────────────────────────

#[tokio::test]
async fn reprocessing_the_same_title_overwrites_prior_output() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let paper = write_paper(input.path(), "same.txt", "Same Title\n\nFirst body.");

    let processor = processor_with(Arc::new(FixedProvider("first run")));
    processor
        .process(paper.to_str().unwrap(), output.path(), false)
        .await
        .unwrap();

    write_paper(input.path(), "same.txt", "Same Title\n\nSecond body.");
    let processor = processor_with(Arc::new(FixedProvider("second run")));
    processor
        .process(paper.to_str().unwrap(), output.path(), false)
        .await
        .unwrap();

    let summary = read(
        &output
            .path()
            .join("summaries")
            .join("Same_Title_summary.md"),
    );
    assert!(summary.contains("second run"));
    assert!(!summary.contains("first run"));
}

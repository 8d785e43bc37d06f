//! Value types flowing through the pipeline.
//!
//! A [`PaperRecord`] is produced once per discovered source by the parser and
//! is immutable from then on. The extractor copies its fields into an
//! [`ExtractionResult`] together with the model's output; the formatter is
//! the only consumer of that result.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a paper came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaperSource {
    /// A single local file given on the command line.
    File,
    /// A plain HTTP/HTTPS URL.
    Url,
    /// A bare arXiv identifier such as `2301.00001` or `hep-th/9901001`.
    ArxivId,
    /// A file discovered while scanning a directory.
    DirectoryEntry,
}

impl fmt::Display for PaperSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaperSource::File => "file",
            PaperSource::Url => "url",
            PaperSource::ArxivId => "arxiv",
            PaperSource::DirectoryEntry => "directory",
        };
        f.write_str(s)
    }
}

/// A parsed paper: metadata plus the full normalized body text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperRecord {
    /// Paper title. Never empty; falls back to the filename stem.
    pub title: String,
    /// Author names in document order. May be empty when no author line
    /// could be recognized.
    pub authors: Vec<String>,
    /// Kind of source the record was built from.
    pub source: PaperSource,
    /// Canonical location for remote sources, `None` for local files.
    pub url: Option<String>,
    /// Abstract text, possibly empty.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Full body text used for extraction.
    pub content: String,
}

/// The extractor's output: the relevant [`PaperRecord`] fields plus the
/// model's extracted technical text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub title: String,
    pub authors: Vec<String>,
    pub source: PaperSource,
    pub url: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Extracted technical content, or an embedded error string when the
    /// provider call failed.
    pub technical_content: String,
}

impl ExtractionResult {
    /// Pair a record with the model's output.
    pub fn from_record(paper: &PaperRecord, technical_content: String) -> Self {
        Self {
            title: paper.title.clone(),
            authors: paper.authors.clone(),
            source: paper.source,
            url: paper.url.clone(),
            abstract_text: paper.abstract_text.clone(),
            technical_content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_display() {
        assert_eq!(PaperSource::File.to_string(), "file");
        assert_eq!(PaperSource::ArxivId.to_string(), "arxiv");
        assert_eq!(PaperSource::DirectoryEntry.to_string(), "directory");
    }

    #[test]
    fn result_copies_record_fields() {
        let paper = PaperRecord {
            title: "Attention Is All You Need".into(),
            authors: vec!["Vaswani".into(), "Shazeer".into()],
            source: PaperSource::Url,
            url: Some("https://arxiv.org/abs/1706.03762".into()),
            abstract_text: "The dominant sequence transduction models".into(),
            content: "body".into(),
        };
        let result = ExtractionResult::from_record(&paper, "methods".into());
        assert_eq!(result.title, paper.title);
        assert_eq!(result.authors, paper.authors);
        assert_eq!(result.url, paper.url);
        assert_eq!(result.technical_content, "methods");
    }
}

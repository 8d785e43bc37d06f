//! Paper discovery and multi-format ingestion.
//!
//! The parser turns any supported source string into a uniform
//! [`PaperRecord`]:
//!
//! * local `.pdf` files via text-layer extraction, `.txt`/`.md` via direct
//!   read;
//! * directories via [`PaperParser::find_papers_in_directory`];
//! * HTTP/HTTPS URLs by downloading into a temp directory and parsing the
//!   result as a local file (arXiv `abs`/`pdf` URLs are canonicalised to
//!   the PDF endpoint first);
//! * bare arXiv identifiers (`2301.00001`, `arXiv:2301.00001v2`,
//!   `hep-th/9901001`) by resolving them to the arXiv PDF endpoint.
//!
//! Title, authors, and abstract are derived heuristically from the text
//! since most source formats carry no structured metadata: first heading
//! (or first short line) as title with the filename stem as fallback, an
//! `Authors:`/`by` line for authors, and the paragraph after an `Abstract`
//! header for the abstract.

use crate::error::WinnowerError;
use crate::paper::{PaperRecord, PaperSource};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tracing::{debug, info};

/// File extensions the discovery step recognizes as papers.
pub const RECOGNIZED_EXTENSIONS: &[&str] = &["pdf", "txt", "md"];

/// Timeout for downloading remote sources.
const DOWNLOAD_TIMEOUT_SECS: u64 = 120;

// arXiv identifier forms: post-2007 `YYMM.NNNNN[vN]` and pre-2007
// `archive/NNNNNNN[vN]`, both with an optional `arXiv:` prefix.
static RE_ARXIV_NEW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:arXiv:)?(\d{4}\.\d{4,5})(?:v\d+)?$").unwrap());

static RE_ARXIV_OLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:arXiv:)?([a-z\-]+/\d{7})(?:v\d+)?$").unwrap());

static RE_ARXIV_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"arxiv\.org/(?:abs|pdf)/(\d{4}\.\d{4,5}|[a-z\-]+/\d{7})(?:v\d+)?").unwrap()
});

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Extract a bare arXiv identifier, tolerating the `arXiv:` prefix and a
/// version tag. Returns the canonical id without either.
pub fn arxiv_id(input: &str) -> Option<String> {
    let trimmed = input.trim();
    RE_ARXIV_NEW
        .captures(trimmed)
        .or_else(|| RE_ARXIV_OLD.captures(trimmed))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract an arXiv identifier from an `arxiv.org/abs/...` or
/// `arxiv.org/pdf/...` URL.
fn arxiv_id_from_url(url: &str) -> Option<String> {
    RE_ARXIV_URL
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Discovers paper sources and normalizes each into a [`PaperRecord`].
#[derive(Debug, Default)]
pub struct PaperParser;

impl PaperParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a source string: local file, URL, or arXiv identifier.
    pub async fn parse(&self, source: &str) -> Result<PaperRecord, WinnowerError> {
        let path = Path::new(source);
        if path.is_file() {
            return parse_local_file(path, PaperSource::File, None).await;
        }

        if is_url(source) {
            return parse_remote(source).await;
        }

        if let Some(id) = arxiv_id(source) {
            return parse_arxiv(&id).await;
        }

        Err(WinnowerError::UnsupportedSource {
            input: source.to_string(),
        })
    }

    /// Enumerate paper files under `dir`. Only the top level is scanned
    /// unless `recursive` is set. The listing is sorted so the processing
    /// order is stable within a run.
    pub fn find_papers_in_directory(
        &self,
        dir: &Path,
        recursive: bool,
    ) -> Result<Vec<PathBuf>, WinnowerError> {
        let mut found = Vec::new();
        collect_papers(dir, recursive, &mut found)?;
        found.sort();
        debug!("Found {} paper file(s) in {}", found.len(), dir.display());
        Ok(found)
    }
}

fn collect_papers(
    dir: &Path,
    recursive: bool,
    found: &mut Vec<PathBuf>,
) -> Result<(), WinnowerError> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if recursive {
                collect_papers(&path, recursive, found)?;
            }
            continue;
        }
        if has_recognized_extension(&path) {
            found.push(path);
        }
    }
    Ok(())
}

/// Check a path against [`RECOGNIZED_EXTENSIONS`], case-insensitively.
pub(crate) fn has_recognized_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            RECOGNIZED_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

// ── Remote sources ───────────────────────────────────────────────────────

/// Parse a URL source. arXiv page URLs are canonicalised to the PDF
/// endpoint; everything else is fetched as-is.
async fn parse_remote(url: &str) -> Result<PaperRecord, WinnowerError> {
    let fetch_url = match arxiv_id_from_url(url) {
        Some(id) => format!("https://arxiv.org/pdf/{id}.pdf"),
        None => url.to_string(),
    };

    let (_temp_dir, path) = download_to_temp(&fetch_url).await?;
    parse_local_file(&path, PaperSource::Url, Some(url.to_string())).await
}

/// Parse a bare arXiv identifier. Provenance records the abstract page,
/// while the fetch goes to the full-text PDF endpoint.
async fn parse_arxiv(id: &str) -> Result<PaperRecord, WinnowerError> {
    let pdf_url = format!("https://arxiv.org/pdf/{id}.pdf");
    let abs_url = format!("https://arxiv.org/abs/{id}");

    let (_temp_dir, path) = download_to_temp(&pdf_url).await?;
    parse_local_file(&path, PaperSource::ArxivId, Some(abs_url)).await
}

fn fetch_err(url: &str, reason: impl ToString) -> WinnowerError {
    WinnowerError::Fetch {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}

/// Download a URL into a fresh temp directory and return the path.
///
/// The `TempDir` is returned alongside the path and must be kept alive
/// until parsing completes; dropping it removes the file.
async fn download_to_temp(url: &str) -> Result<(TempDir, PathBuf), WinnowerError> {
    info!("Downloading paper from: {url}");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
        .build()
        .map_err(|e| fetch_err(url, e))?;

    let response = client.get(url).send().await.map_err(|e| fetch_err(url, e))?;
    if !response.status().is_success() {
        return Err(fetch_err(url, format!("HTTP {}", response.status())));
    }

    let bytes = response.bytes().await.map_err(|e| fetch_err(url, e))?;
    let filename = remote_filename(url, &bytes);

    let temp_dir = TempDir::new()?;
    let file_path = temp_dir.path().join(filename);
    tokio::fs::write(&file_path, &bytes).await?;

    debug!("Downloaded to: {}", file_path.display());
    Ok((temp_dir, file_path))
}

/// Pick a local filename for a downloaded document: the URL's last path
/// segment when it has an extension, corrected by content sniffing so the
/// extension dispatch in [`parse_local_file`] sees the right format.
fn remote_filename(url: &str, bytes: &[u8]) -> String {
    let segment = url
        .split('/')
        .next_back()
        .unwrap_or("")
        .split(['?', '#'])
        .next()
        .unwrap_or("");

    let mut name = if segment.is_empty() {
        "downloaded".to_string()
    } else {
        segment.to_string()
    };

    let looks_like_pdf = bytes.len() >= 4 && &bytes[..4] == b"%PDF";
    if looks_like_pdf {
        if !name.to_ascii_lowercase().ends_with(".pdf") {
            name.push_str(".pdf");
        }
    } else if !name.contains('.') {
        name.push_str(".txt");
    }
    name
}

// ── Local files ──────────────────────────────────────────────────────────

/// Decode a local file into text and derive its metadata.
async fn parse_local_file(
    path: &Path,
    source: PaperSource,
    url: Option<String>,
) -> Result<PaperRecord, WinnowerError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let text = match ext.as_str() {
        "pdf" => extract_pdf_text(path).await?,
        "txt" | "md" => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| WinnowerError::ExtractionFailure {
                    path: path.to_path_buf(),
                    detail: e.to_string(),
                })?
        }
        other => {
            return Err(WinnowerError::ExtractionFailure {
                path: path.to_path_buf(),
                detail: format!("unrecognized file extension '{other}'"),
            })
        }
    };

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("paper");
    Ok(build_record(&text, stem, source, url))
}

/// Extract the text layer from a PDF.
///
/// Runs in `spawn_blocking`: the decoder walks the whole document
/// synchronously and can take seconds on large papers.
async fn extract_pdf_text(path: &Path) -> Result<String, WinnowerError> {
    let owned = path.to_path_buf();
    let result = tokio::task::spawn_blocking(move || pdf_extract::extract_text(&owned))
        .await
        .map_err(|e| WinnowerError::ExtractionFailure {
            path: path.to_path_buf(),
            detail: format!("extraction task failed: {e}"),
        })?;

    result.map_err(|e| WinnowerError::ExtractionFailure {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

// ── Metadata heuristics ──────────────────────────────────────────────────

fn build_record(
    text: &str,
    stem: &str,
    source: PaperSource,
    url: Option<String>,
) -> PaperRecord {
    PaperRecord {
        title: derive_title(text, stem),
        authors: derive_authors(text),
        source,
        url,
        abstract_text: derive_abstract(text),
        content: text.trim().to_string(),
    }
}

/// Title heuristic: first markdown heading wins, otherwise the first
/// short non-empty line, otherwise the filename stem.
fn derive_title(text: &str, stem: &str) -> String {
    for line in text.lines().take(20) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(heading) = line.strip_prefix('#') {
            let heading = heading.trim_start_matches('#').trim();
            if !heading.is_empty() {
                return heading.to_string();
            }
            continue;
        }
        if line.chars().count() <= 200 {
            return line.to_string();
        }
        break;
    }

    let stem = stem.trim();
    if stem.is_empty() {
        "paper".to_string()
    } else {
        stem.replace(['_', '-'], " ")
    }
}

/// Author heuristic: an `Authors:` or `by` line near the top of the
/// document, split on commas, semicolons, and `and`.
fn derive_authors(text: &str) -> Vec<String> {
    for line in text.lines().take(40) {
        let trimmed = line.trim();
        let rest = trimmed
            .strip_prefix("Authors:")
            .or_else(|| trimmed.strip_prefix("authors:"))
            .or_else(|| trimmed.strip_prefix("Author:"))
            .or_else(|| trimmed.strip_prefix("by "))
            .or_else(|| trimmed.strip_prefix("By "));
        if let Some(rest) = rest {
            let authors = split_author_list(rest);
            if !authors.is_empty() {
                return authors;
            }
        }
    }
    Vec::new()
}

fn split_author_list(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .flat_map(|part| part.split(" and "))
        .map(|name| name.trim().trim_end_matches('.').trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Abstract length cap; a multi-page "abstract" means the heuristic
/// latched onto the wrong header.
const MAX_ABSTRACT_CHARS: usize = 1500;

/// Abstract heuristic: the paragraph following an `Abstract` header line,
/// or the remainder of an inline `Abstract: ...` line plus its paragraph.
fn derive_abstract(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();

    for (i, line) in lines.iter().enumerate().take(100) {
        let t = line.trim().trim_start_matches('#').trim();
        let lower = t.to_ascii_lowercase();
        let is_header =
            lower == "abstract" || lower.starts_with("abstract:") || lower.starts_with("abstract.");
        if !is_header {
            continue;
        }

        let mut parts: Vec<String> = Vec::new();
        if let Some(rest) = t.get("abstract".len()..) {
            let rest = rest.trim_start_matches([':', '.']).trim();
            if !rest.is_empty() {
                parts.push(rest.to_string());
            }
        }

        let mut j = i + 1;
        if parts.is_empty() {
            while j < lines.len() && lines[j].trim().is_empty() {
                j += 1;
            }
        }
        while j < lines.len() {
            let l = lines[j].trim();
            if l.is_empty() || l.starts_with('#') {
                break;
            }
            parts.push(l.to_string());
            j += 1;
        }

        let joined = parts.join(" ");
        return if joined.chars().count() > MAX_ABSTRACT_CHARS {
            joined.chars().take(MAX_ABSTRACT_CHARS).collect()
        } else {
            joined
        };
    }

    String::new()
}

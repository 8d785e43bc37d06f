//! Error types for the winnower library.
//!
//! Failures fall into three tiers, and the tier decides how far an error
//! propagates:
//!
//! * **Fatal** ([`WinnowerError::InvalidConfig`] and argument-level problems
//!   surfaced by the CLI): the run cannot start at all.
//!
//! * **Per-paper** (unsupported source, undecodable document, fetch failure,
//!   output write failure): the current paper is abandoned and logged, and
//!   the batch moves on to the next source. These are returned as
//!   `Err(WinnowerError)` from the parser and processor internals and caught
//!   by the batch loop.
//!
//! * **Provider call failures**: caught inside the extractor and embedded as
//!   text in the output document. They never surface as `Err` at all, so a
//!   flaky API or missing key still yields a summary file per paper.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the winnower library.
#[derive(Debug, Error)]
pub enum WinnowerError {
    // ── Discovery errors ──────────────────────────────────────────────────
    /// The input string is not a readable file, a directory, a URL, or a
    /// recognized paper identifier.
    #[error("Unsupported paper source: '{input}'\nExpected a file path, directory, URL, or arXiv identifier.")]
    UnsupportedSource { input: String },

    // ── Parsing errors ────────────────────────────────────────────────────
    /// The document exists but its format could not be decoded into text.
    #[error("Failed to extract text from '{path}': {detail}")]
    ExtractionFailure { path: PathBuf, detail: String },

    // ── Network errors ────────────────────────────────────────────────────
    /// A remote paper source could not be fetched.
    #[error("Failed to fetch '{url}': {reason}")]
    Fetch { url: String, reason: String },

    // ── Provider errors ───────────────────────────────────────────────────
    /// The requested AI provider name is not one of the supported variants.
    #[error("Unsupported model provider: '{provider}' (expected 'openai' or 'anthropic')")]
    UnsupportedProvider { provider: String },

    /// The provider call failed: network, auth, rate limit, or a response
    /// that did not match the expected shape. Caught inside the extractor
    /// and embedded as text in the output document, never raised further.
    #[error("{provider} API error: {message}")]
    Provider { provider: String, message: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Configuration file or environment override was malformed, or the
    /// merged values failed validation. Fatal at startup.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output artifact.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Other filesystem errors (unreadable input, directory listing).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

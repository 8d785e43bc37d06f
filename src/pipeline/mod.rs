//! Pipeline stages for paper-to-summary processing.
//!
//! Each submodule implements exactly one transformation step, keeping the
//! stages independently testable.
//!
//! ## Data Flow
//!
//! ```text
//! source ──▶ parser ──▶ preprocess ──▶ extract
//! (path/URL/id) (text + metadata) (cleanup)  (LLM call)
//! ```
//!
//! 1. [`parser`] resolves the user-supplied path, directory, URL, or arXiv
//!    identifier into a [`crate::paper::PaperRecord`]; PDF decoding runs in
//!    `spawn_blocking` because the text-layer extraction is CPU-bound
//! 2. [`preprocess`] applies deterministic text cleanup (whitespace
//!    collapse, boilerplate-section stripping, content truncation)
//! 3. [`extract`] builds the extraction prompt and drives the provider
//!    call; the only stage with LLM network I/O

pub mod extract;
pub mod parser;
pub mod preprocess;

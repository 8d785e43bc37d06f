//! Technical extraction: build the prompt and drive the provider call.
//!
//! This module is intentionally thin. Prompt text lives in
//! [`crate::prompts`], content cleanup in
//! [`crate::pipeline::preprocess`], and the wire protocol in
//! [`crate::provider`]; what remains here is the glue and one policy
//! decision: a provider failure is converted into embedded error text
//! rather than propagated, so a single paper's extraction failure can
//! never abort a batch. `extract` has no error path at all.

use crate::config::WinnowerConfig;
use crate::error::WinnowerError;
use crate::paper::{ExtractionResult, PaperRecord};
use crate::pipeline::preprocess::{preprocess, truncate_content};
use crate::prompts::build_extraction_prompt;
use crate::provider::{create_provider, LlmProvider};
use std::sync::Arc;
use tracing::{debug, warn};

/// Prefix of the embedded error text written when a provider call fails.
pub const EXTRACTION_ERROR_PREFIX: &str = "Error extracting technical content:";

/// Extracts technical content from parsed papers via an LLM provider.
pub struct TechnicalExtractor {
    provider: Arc<dyn LlmProvider>,
}

impl TechnicalExtractor {
    /// Build an extractor for the named provider (`openai` or
    /// `anthropic`).
    ///
    /// A pre-constructed [`WinnowerConfig::provider`] takes precedence
    /// over the name; tests and embedders use that hook to supply custom
    /// backends.
    pub fn new(provider_name: &str, config: &WinnowerConfig) -> Result<Self, WinnowerError> {
        if let Some(provider) = &config.provider {
            return Ok(Self {
                provider: Arc::clone(provider),
            });
        }
        Ok(Self {
            provider: create_provider(provider_name, config)?,
        })
    }

    /// Build an extractor around an existing provider.
    pub fn with_provider(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Extract technical content from a paper.
    ///
    /// Always returns a result: when the provider call fails, the
    /// `technical_content` field carries the error as text prefixed with
    /// [`EXTRACTION_ERROR_PREFIX`].
    pub async fn extract(&self, paper: &PaperRecord) -> ExtractionResult {
        debug!("Extracting technical content from '{}'", paper.title);

        let content = preprocess(&paper.content);
        let content = truncate_content(&content);
        let prompt = build_extraction_prompt(&paper.title, &content);

        let technical_content = match self.provider.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    "{} call failed for '{}': {e}",
                    self.provider.name(),
                    paper.title
                );
                format!("{EXTRACTION_ERROR_PREFIX} {e}")
            }
        };

        ExtractionResult::from_record(paper, technical_content)
    }
}

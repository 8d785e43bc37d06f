//! Prompt templates for technical extraction.
//!
//! Centralising the prompt here keeps it a single source of truth: the
//! extractor builds requests from these constants and unit tests can assert
//! on prompt structure without touching a live provider.

/// System message sent alongside the extraction prompt (OpenAI request
/// shape only; the Anthropic shape carries the whole prompt as a single
/// user message).
pub const SYSTEM_PROMPT: &str =
    "You are a technical reviewer extracting core technical details from research papers.";

/// Marker appended when paper content is cut at [`MAX_CONTENT_CHARS`].
pub const TRUNCATION_MARKER: &str = "\n[Content truncated for processing]";

/// Maximum number of characters of paper content sent to a provider.
pub const MAX_CONTENT_CHARS: usize = 100_000;

/// Extraction prompt template. `{title}` and `{content}` are substituted by
/// [`build_extraction_prompt`].
pub const EXTRACTION_PROMPT: &str = r#"
You are a technical reviewer tasked with extracting the core technical details from a research paper.

Focus on extracting:
1. **Core Methods**: The fundamental approaches, algorithms, or techniques
2. **Technical Implementation**: Specific algorithms, mathematical formulations, architectural details
3. **Key Innovations**: Novel technical contributions or improvements
4. **Technical Parameters**: Important hyperparameters, model configurations, technical specifications
5. **Experimental Setup**: Technical aspects of experiments (not results/benchmarks)

IGNORE:
- Marketing language and promotional content
- Extensive benchmark comparisons and results tables
- Related work sections (unless they contain technical details for the current work)
- General background information
- Detailed experimental results and performance metrics

Extract the information and structure it with clear headings. Be concise but comprehensive for technical details.

Paper Title: {title}

Paper Content:
{content}

Extract the technical details following the structure above:
"#;

/// Substitute title and content into the extraction template.
///
/// Content is substituted first: the template's title slot precedes its
/// content slot, so even a body that itself contains `{title}` cannot
/// capture the title substitution, and a title containing `{content}` is
/// inserted only after the content slot is gone.
pub fn build_extraction_prompt(title: &str, content: &str) -> String {
    EXTRACTION_PROMPT
        .replacen("{content}", content, 1)
        .replacen("{title}", title, 1)
}

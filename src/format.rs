//! Markdown rendering of extraction results.
//!
//! Pure string assembly: no network, no filesystem. The layout is fixed so
//! downstream tooling can rely on the heading structure.

use crate::paper::ExtractionResult;

/// Render an extraction result as a standalone markdown document.
///
/// Layout: title heading, metadata block (authors, source kind, URL,
/// abstract), then the technical content verbatim under its own heading.
pub fn format_summary(result: &ExtractionResult) -> String {
    let mut doc = String::with_capacity(result.technical_content.len() + 512);

    doc.push_str(&format!("# {}\n\n", result.title));

    doc.push_str("## Metadata\n\n");
    let authors = if result.authors.is_empty() {
        "Unknown".to_string()
    } else {
        result.authors.join(", ")
    };
    doc.push_str(&format!("- **Authors**: {authors}\n"));
    doc.push_str(&format!("- **Source**: {}\n", result.source));
    if let Some(url) = &result.url {
        doc.push_str(&format!("- **URL**: {url}\n"));
    }
    doc.push('\n');

    if !result.abstract_text.is_empty() {
        doc.push_str("## Abstract\n\n");
        doc.push_str(&result.abstract_text);
        doc.push_str("\n\n");
    }

    doc.push_str("## Technical Content\n\n");
    doc.push_str(&result.technical_content);
    if !result.technical_content.ends_with('\n') {
        doc.push('\n');
    }

    doc
}

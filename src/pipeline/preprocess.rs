//! Content preprocessing: deterministic cleanup before extraction.
//!
//! Three pure passes run in a defined order:
//!
//! 1. Collapse consecutive newlines to single newlines
//! 2. Collapse all whitespace runs to single spaces
//! 3. Cut the document at the earliest boilerplate section header
//!    (`References`, `Bibliography`, `Acknowledgment(s)`,
//!    `Appendix [letter]`), case-insensitively
//!
//! The boilerplate cut uses the minimum match offset across all patterns
//! rather than applying each pattern in turn: every pattern removes to
//! end-of-document, so only the earliest occurrence matters, and a
//! sequential application could under-trim when a later pattern's header
//! precedes an earlier one's.
//!
//! `preprocess` is idempotent on already-normalized text, which lets the
//! extractor re-run it without tracking whether a record was normalized
//! upstream.

use crate::prompts::{MAX_CONTENT_CHARS, TRUNCATION_MARKER};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static RE_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").unwrap());

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Section headers considered non-technical. Each cuts the document from
/// its first occurrence to the end.
static BOILERPLATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\breferences\b",
        r"(?i)\bbibliography\b",
        r"(?i)\backnowledgments?\b",
        r"(?i)\bappendix(?:\s+[a-z])?\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Normalize paper content for extraction.
pub fn preprocess(content: &str) -> String {
    let collapsed = RE_NEWLINES.replace_all(content, "\n");
    let collapsed = RE_WHITESPACE.replace_all(&collapsed, " ");
    strip_boilerplate(&collapsed).trim().to_string()
}

/// Cut at the earliest boilerplate header across all patterns.
fn strip_boilerplate(text: &str) -> &str {
    let earliest = BOILERPLATE_PATTERNS
        .iter()
        .filter_map(|re| re.find(text).map(|m| m.start()))
        .min();

    match earliest {
        Some(idx) => &text[..idx],
        None => text,
    }
}

/// Cap content at [`MAX_CONTENT_CHARS`] characters, appending
/// [`TRUNCATION_MARKER`] when a cut was made. Content at or under the cap
/// is returned unmodified.
pub fn truncate_content(content: &str) -> Cow<'_, str> {
    match content.char_indices().nth(MAX_CONTENT_CHARS) {
        Some((byte_idx, _)) => {
            let mut cut = content[..byte_idx].to_string();
            cut.push_str(TRUNCATION_MARKER);
            Cow::Owned(cut)
        }
        None => Cow::Borrowed(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_newlines_and_whitespace() {
        let input = "line one\n\n\nline two\t\twith   gaps";
        assert_eq!(preprocess(input), "line one line two with gaps");
    }

    #[test]
    fn strips_references_to_end() {
        let input = "Method details here.\nReferences\n[1] Someone et al.";
        assert_eq!(preprocess(input), "Method details here.");
    }

    #[test]
    fn strips_each_boilerplate_kind() {
        for header in ["References", "Bibliography", "Acknowledgments", "Acknowledgment", "Appendix A", "Appendix"] {
            let input = format!("Core content.\n{header}\ntrailing matter");
            assert_eq!(preprocess(&input), "Core content.", "header: {header}");
        }
    }

    #[test]
    fn boilerplate_match_is_case_insensitive() {
        let input = "Core content.\nREFERENCES\n[1] cite";
        assert_eq!(preprocess(input), "Core content.");
    }

    #[test]
    fn earliest_header_wins() {
        // Appendix precedes References: the cut must land on the appendix,
        // not on the later pattern.
        let input = "Body.\nAppendix B\nextra proofs\nReferences\n[1] cite";
        assert_eq!(preprocess(input), "Body.");

        // And the other way around.
        let input = "Body.\nReferences\n[1] cite\nAppendix B\nextra proofs";
        assert_eq!(preprocess(input), "Body.");
    }

    #[test]
    fn idempotent_on_normalized_text() {
        let inputs = [
            "Method details here.\nReferences\n[1] Someone et al.",
            "plain body with no boilerplate",
            "spaced    out\n\n\ntext\nAppendix A\nproofs",
        ];
        for input in inputs {
            let once = preprocess(input);
            assert_eq!(preprocess(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn clean_content_is_untouched() {
        assert_eq!(preprocess("already normalized text"), "already normalized text");
    }

    #[test]
    fn truncation_law() {
        // At the cap: unmodified.
        let exact = "a".repeat(MAX_CONTENT_CHARS);
        let kept = truncate_content(&exact);
        assert_eq!(kept.len(), MAX_CONTENT_CHARS);
        assert!(!kept.contains("[Content truncated"));

        // Over the cap: cut plus marker.
        let over = "a".repeat(MAX_CONTENT_CHARS + 17);
        let cut = truncate_content(&over);
        assert!(cut.ends_with(TRUNCATION_MARKER));
        assert_eq!(
            cut.chars().count(),
            MAX_CONTENT_CHARS + TRUNCATION_MARKER.chars().count()
        );
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // Multi-byte characters around the cut point must not split.
        let over = "é".repeat(MAX_CONTENT_CHARS + 5);
        let cut = truncate_content(&over);
        assert!(cut.ends_with(TRUNCATION_MARKER));
        assert_eq!(
            cut.chars().count(),
            MAX_CONTENT_CHARS + TRUNCATION_MARKER.chars().count()
        );
    }
}

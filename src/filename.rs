//! Safe-filename generation from paper titles.
//!
//! Titles come from untrusted documents and land directly in output paths,
//! so the mapping is security-hardened: path separators, traversal
//! sequences, control characters, hidden-file dots, and Windows reserved
//! device names are all neutralized. The function is pure and total; every
//! input string, including empty and all-punctuation ones, maps to a usable
//! single path segment, and identical input always yields identical output.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length of the generated basename, before any suffix.
const MAX_STEM_CHARS: usize = 50;

/// Fallback stem when the sanitized title is empty or too short to be useful.
const FALLBACK_STEM: &str = "paper";

/// Windows reserved device names. Writing to `CON.md` on Windows talks to
/// the console device instead of creating a file.
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

static RE_UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new("[<>:\"/\\\\|?*\\x00-\\x1f]").unwrap());

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Map an arbitrary title to a filesystem-safe basename, optionally with a
/// `_<suffix>` tail (e.g. `safe_filename("My Paper", Some("summary"))` gives
/// `"My_Paper_summary"`).
///
/// Sanitization steps, in order:
/// 1. Replace `< > : " / \ | ? *` and ASCII control characters with `_`
/// 2. Replace `..` and `~` with `_` (path traversal, home expansion)
/// 3. Collapse whitespace runs to a single `_`
/// 4. Strip leading dots (hidden files) and trim non-alphanumeric edges
/// 5. Truncate to 50 characters, dropping any `_` left dangling by the cut
/// 6. Fall back to `"paper"` when fewer than 3 characters remain
/// 7. Prefix `paper_` when the stem matches a Windows reserved device name
pub fn safe_filename(title: &str, suffix: Option<&str>) -> String {
    let cleaned = RE_UNSAFE_CHARS.replace_all(title, "_");
    let cleaned = cleaned.replace("..", "_").replace('~', "_");
    let cleaned = RE_WHITESPACE.replace_all(&cleaned, "_");

    let trimmed = cleaned
        .trim_start_matches('.')
        .trim_matches(|c: char| !c.is_alphanumeric());

    let mut stem: String = if trimmed.chars().count() > MAX_STEM_CHARS {
        let cut: String = trimmed.chars().take(MAX_STEM_CHARS).collect();
        cut.trim_end_matches('_').to_string()
    } else {
        trimmed.to_string()
    };

    if stem.chars().count() < 3 {
        stem = FALLBACK_STEM.to_string();
    }

    // `CON.md`, `lpt1.txt` etc. are device names regardless of extension.
    let base = stem.split('.').next().unwrap_or("").to_ascii_uppercase();
    if RESERVED_NAMES.contains(&base.as_str()) {
        stem = format!("{FALLBACK_STEM}_{stem}");
    }

    match suffix {
        Some(suf) => format!("{stem}_{suf}"),
        None => stem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_title() {
        assert_eq!(safe_filename("My Paper", None), "My_Paper");
    }

    #[test]
    fn trailing_punctuation_is_trimmed() {
        assert_eq!(safe_filename("My Paper!!", None), "My_Paper");
        assert_eq!(
            safe_filename("My Paper!!", Some("summary")),
            "My_Paper_summary"
        );
    }

    #[test]
    fn path_traversal_is_neutralized() {
        let name = safe_filename("../../etc/passwd", None);
        assert!(!name.contains('/'));
        assert!(!name.contains(".."));
        assert!(!name.is_empty());
    }

    #[test]
    fn tilde_and_separators() {
        let name = safe_filename("~/.ssh/authorized_keys", None);
        assert!(!name.contains('~'));
        assert!(!name.contains('/'));
    }

    #[test]
    fn control_characters_are_stripped() {
        let name = safe_filename("bad\x00\x01\x1ftitle", None);
        assert!(name.chars().all(|c| !c.is_control()));
    }

    #[test]
    fn reserved_device_names_are_prefixed() {
        assert_eq!(safe_filename("CON", None), "paper_CON");
        assert_eq!(safe_filename("con.pdf", None), "paper_con.pdf");
        assert_eq!(safe_filename("LPT1", None), "paper_LPT1");
        // Not reserved: merely starts with a reserved word.
        assert_eq!(safe_filename("CONTEXT", None), "CONTEXT");
    }

    #[test]
    fn hidden_file_dots_are_stripped() {
        let name = safe_filename(".hidden", None);
        assert!(!name.starts_with('.'));
    }

    #[test]
    fn long_titles_are_truncated() {
        let long = "a".repeat(120);
        let name = safe_filename(&long, None);
        assert_eq!(name.chars().count(), 50);

        let with_suffix = safe_filename(&long, Some("extracted"));
        assert!(with_suffix.ends_with("_extracted"));
        assert!(with_suffix.chars().count() <= 50 + "_extracted".chars().count());
    }

    #[test]
    fn truncation_does_not_leave_trailing_underscore() {
        // 49 chars then a space then more: the cut lands on the `_`
        // produced from the space.
        let title = format!("{} tail of the title", "b".repeat(49));
        let name = safe_filename(&title, None);
        assert!(!name.ends_with('_'));
    }

    #[test]
    fn empty_and_junk_titles_fall_back() {
        assert_eq!(safe_filename("", None), "paper");
        assert_eq!(safe_filename("!!!", None), "paper");
        assert_eq!(safe_filename("..", None), "paper");
        assert_eq!(safe_filename("  \t \n ", None), "paper");
        assert_eq!(safe_filename("ab", None), "paper");
    }

    #[test]
    fn deterministic() {
        let title = "Stochastic Gradient Descent: A ~Deep~ Dive?!";
        assert_eq!(safe_filename(title, None), safe_filename(title, None));
    }

    #[test]
    fn unicode_titles_survive() {
        let name = safe_filename("Éléments de Géométrie Algébrique", None);
        assert!(name.starts_with("Éléments"));
        assert!(!name.contains(' '));
    }
}

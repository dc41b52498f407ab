//! Post-processing: light cleanup of the generated report.
//!
//! The report is not validated against the expected structure; a deviation
//! just renders as best-effort paragraphs and tables. These rules only undo
//! transport quirks that would otherwise break line classification:
//!
//! 1. Strip an outer ```` ```markdown ```` fence around the whole report
//! 2. Normalise line endings (CRLF → LF)
//! 3. Trim trailing whitespace per line
//! 4. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens)
//!
//! Tables are left alone: divider rows and `||` markers carry meaning for the
//! table renderer.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup rules in order.
pub fn clean_report(input: &str) -> String {
    let s = strip_markdown_fences(input);
    let s = normalise_line_endings(&s);
    let s = trim_trailing_whitespace(&s);
    remove_invisible_chars(&s)
}

// ── Rule 1: Strip outer markdown fences ──────────────────────────────────────

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:markdown|md)?\r?\n(.*)\r?\n```\s*$").unwrap());

fn strip_markdown_fences(input: &str) -> String {
    if let Some(caps) = RE_OUTER_FENCES.captures(input.trim()) {
        caps[1].to_string()
    } else {
        input.to_string()
    }
}

// ── Rule 2: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 3: Trim trailing whitespace per line ────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 4: Remove invisible Unicode characters ─────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fences() {
        assert_eq!(strip_markdown_fences("```markdown\n# Informe\nText\n```"), "# Informe\nText");
        assert_eq!(strip_markdown_fences("```\n# Informe\n```"), "# Informe");
    }

    #[test]
    fn test_no_fences_passthrough() {
        let input = "# Informe\nText";
        assert_eq!(strip_markdown_fences(input), input);
    }

    #[test]
    fn test_normalise_line_endings() {
        assert_eq!(normalise_line_endings("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_trim_trailing_whitespace() {
        assert_eq!(trim_trailing_whitespace("  | a |   \nb  "), "  | a |\nb");
    }

    #[test]
    fn test_remove_invisible() {
        assert_eq!(remove_invisible_chars("\u{FEFF}# Informe\u{200B}"), "# Informe");
    }

    #[test]
    fn test_clean_report_keeps_tables_and_tokens() {
        let input = "```markdown\r\n# Valors\r\n| A || B |\r\n| --- | --- |\r\n[[PAGE_BREAK]]  \r\n```";
        let cleaned = clean_report(input);
        assert_eq!(cleaned, "# Valors\n| A || B |\n| --- | --- |\n[[PAGE_BREAK]]");
    }
}

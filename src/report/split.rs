//! Report splitting: one generated report → ordered pages, one per dimension.
//!
//! The model is asked to separate dimensions with [`PAGE_BREAK`]. It does not
//! always comply, so when the token yields fewer than two usable pages the
//! report is cut instead at each heading that names a dimension. Thresholds
//! only reject near-empty fragments left behind by the split; they do not
//! validate content.

use crate::profile::Dimension;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Literal marker delimiting pages inside a report.
pub const PAGE_BREAK: &str = "[[PAGE_BREAK]]";

/// Page shown while a report is empty (nothing generated yet).
pub const PROCESSING_PLACEHOLDER: &str = "Processant l'informe...";

/// A token-delimited segment must be longer than this (trimmed, in chars).
const MIN_TOKEN_SEGMENT_CHARS: usize = 10;

/// A heading-delimited segment must be at least this long (trimmed, in chars).
const MIN_HEADING_SEGMENT_CHARS: usize = 50;

/// Start of a level 1–3 heading naming a dimension, optionally numbered
/// (`# Competències`, `## 2. Valors`, `### Personality profile`).
static RE_DIMENSION_HEADING: Lazy<Regex> = Lazy::new(|| {
    let labels = Dimension::ALL
        .iter()
        .flat_map(|d| [d.label(), d.english_label()])
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?mi)^#{{1,3}}[ \t]*(?:\d+\.[ \t]*)?(?:{labels})\b")).unwrap()
});

/// Split a report into pages.
///
/// Always returns at least one page:
/// 1. token split, when it yields more than one segment longer than 10 chars;
/// 2. otherwise dimension-heading split, dropping segments under 50 chars and
///    bare dimension labels;
/// 3. otherwise the whole report (token removed, trimmed), or
///    [`PROCESSING_PLACEHOLDER`] when it is blank.
pub fn split_pages(report: &str) -> Vec<String> {
    if report.contains(PAGE_BREAK) {
        let pages = split_on_token(report);
        if pages.len() > 1 {
            debug!("Split report on page-break token into {} pages", pages.len());
            return pages;
        }
    }

    let untokened = report.replace(PAGE_BREAK, "");
    let pages = split_on_headings(&untokened);
    if !pages.is_empty() {
        debug!("Split report on dimension headings into {} pages", pages.len());
        return pages;
    }

    let whole = untokened.trim();
    if whole.is_empty() {
        vec![PROCESSING_PLACEHOLDER.to_string()]
    } else {
        vec![whole.to_string()]
    }
}

fn split_on_token(report: &str) -> Vec<String> {
    report
        .split(PAGE_BREAK)
        .map(str::trim)
        .filter(|seg| seg.chars().count() > MIN_TOKEN_SEGMENT_CHARS)
        .map(String::from)
        .collect()
}

fn split_on_headings(report: &str) -> Vec<String> {
    let mut starts: Vec<usize> = RE_DIMENSION_HEADING
        .find_iter(report)
        .map(|m| m.start())
        .collect();
    if starts.first() != Some(&0) {
        starts.insert(0, 0);
    }
    let ends = starts.iter().skip(1).copied().chain(std::iter::once(report.len()));

    starts
        .iter()
        .zip(ends)
        .map(|(&start, end)| report[start..end].trim())
        .filter(|seg| seg.chars().count() >= MIN_HEADING_SEGMENT_CHARS && !is_bare_label(seg))
        .map(String::from)
        .collect()
}

fn is_bare_label(segment: &str) -> bool {
    let text = segment.trim_start_matches('#').trim();
    Dimension::ALL.iter().any(|d| {
        text.eq_ignore_ascii_case(d.label()) || text.eq_ignore_ascii_case(d.english_label())
    })
}

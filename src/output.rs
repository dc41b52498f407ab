//! Output types of an analysis run.

use crate::pipeline::postprocess::clean_report;
use crate::report::{self, render_document};
use serde::{Deserialize, Serialize};

/// Result of [`crate::analyze`] or [`crate::render_report`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutput {
    /// The report exactly as produced (or read), page-break tokens included.
    /// This is what the Markdown export writes.
    pub report: String,

    /// The cleaned report split into pages, in order.
    pub pages: Vec<String>,

    pub stats: AnalysisStats,
}

impl AnalysisOutput {
    /// Build an output for `report`, splitting a cleaned copy into pages.
    pub fn new(report: String, stats: AnalysisStats) -> Self {
        let pages = report::split_pages(&clean_report(&report));
        Self {
            report,
            pages,
            stats,
        }
    }

    /// One HTML fragment per page.
    pub fn render_pages(&self) -> Vec<String> {
        self.pages
            .iter()
            .map(|page| report::render_markdown(page))
            .collect()
    }

    /// The report as a standalone printable HTML document.
    pub fn to_html(&self) -> String {
        render_document(&clean_report(&self.report))
    }
}

/// Figures about one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisStats {
    /// Model that produced the report; `None` for rendered-only reports.
    pub model: Option<String>,
    /// Number of inline documents sent.
    pub attachments: usize,
    /// Total decoded size of the inline documents.
    pub attachment_bytes: usize,
    pub input_tokens: usize,
    pub output_tokens: usize,
    /// Wall-clock time of the whole run.
    pub duration_ms: u64,
    /// The model returned nothing and the placeholder report was stored.
    pub placeholder: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_splits_on_construction() {
        let report = "# Competències\nPrimera pàgina prou llarga.\n[[PAGE_BREAK]]\n# Valors\nSegona pàgina prou llarga.";
        let out = AnalysisOutput::new(report.to_string(), AnalysisStats::default());
        assert_eq!(out.pages.len(), 2);
        assert_eq!(out.render_pages().len(), 2);
        assert!(out.to_html().starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn report_is_kept_verbatim() {
        let raw = "```markdown\r\n# Competències\r\nLínia amb salt dur  \r\nsegona línia\r\n```\n";
        let out = AnalysisOutput::new(raw.to_string(), AnalysisStats::default());
        assert_eq!(out.report, raw);
        assert_eq!(
            out.pages,
            vec!["# Competències\nLínia amb salt dur\nsegona línia".to_string()]
        );
        assert!(!out.to_html().contains("```"));
    }

    #[test]
    fn stats_serialise_to_json() {
        let stats = AnalysisStats {
            model: Some("gemini-3-flash-preview".into()),
            attachments: 2,
            ..Default::default()
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"attachments\":2"));
        assert!(json.contains("gemini-3-flash-preview"));
    }
}

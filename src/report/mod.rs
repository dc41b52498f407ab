//! Report rendering: the deterministic half of the crate.
//!
//! ## Data Flow
//!
//! ```text
//! report ──▶ split ──▶ pages ──▶ block ──▶ html ──▶ fragment per page
//!                                   │
//!                                   └──▶ table (+ style) for pipe runs
//! ```
//!
//! 1. [`split`]    — cut a report into pages on `[[PAGE_BREAK]]`, falling back
//!    to dimension headings
//! 2. [`block`]    — classify each line of a page into a [`block::Block`]
//! 3. [`table`]    — parse buffered pipe rows, detect SWOT matrices, render
//! 4. [`style`]    — keyword lookup tables for category and severity styling
//! 5. [`html`]     — emit one fragment per block
//! 6. [`document`] — wrap all pages into a printable standalone document
//!
//! None of these stages performs I/O or can fail.

pub mod block;
pub mod document;
pub mod html;
pub mod split;
pub mod style;
pub mod table;

pub use document::render_document;
pub use html::render_markdown;
pub use split::{split_pages, PAGE_BREAK, PROCESSING_PLACEHOLDER};

/// Split a report and render every page.
pub fn render_pages(report: &str) -> Vec<String> {
    split_pages(report)
        .iter()
        .map(|page| render_markdown(page))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_pages_matches_split() {
        let report = format!("Primera pàgina de prova\n{PAGE_BREAK}\nSegona pàgina de prova");
        let pages = render_pages(&report);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1], r#"<p class="report-paragraph">Segona pàgina de prova</p>"#);
    }
}

//! Page rendering: classified blocks → HTML fragment.
//!
//! Pure and total: every line of the page maps to some fragment (blank lines
//! to nothing), in the original order. Text is emitted as-is; the only
//! input is model output, which may legitimately contain `<br>` and similar
//! inline tags.

use super::block::{parse_blocks, Block};
use super::table::render_table;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static RE_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

/// Render one page of markdown to an HTML fragment.
///
/// Consecutive bullet items share one `<ul>`; numeral-prefixed lines stay
/// paragraphs so the numeral written by the model is not renumbered.
pub fn render_markdown(page: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut in_list = false;

    for block in parse_blocks(page) {
        let is_item = matches!(block, Block::UnorderedItem(_));
        if is_item && !in_list {
            out.push(r#"<ul class="report-list">"#.to_string());
        } else if !is_item && in_list && !matches!(block, Block::Blank) {
            out.push("</ul>".to_string());
        }
        if is_item {
            in_list = true;
        } else if !matches!(block, Block::Blank) {
            in_list = false;
        }

        let html = render_block(&block);
        if !html.is_empty() {
            out.push(html);
        }
    }
    if in_list {
        out.push("</ul>".to_string());
    }
    out.join("\n")
}

fn render_block(block: &Block<'_>) -> String {
    match block {
        Block::Heading { level, text } => format!(
            r#"<h{level} class="report-h{level}">{}</h{level}>"#,
            inline(text)
        ),
        Block::BoldRun(text) | Block::Raw(text) => inline(text).into_owned(),
        Block::OrderedItem(text) => {
            format!(r#"<p class="report-numbered">{}</p>"#, inline(text))
        }
        Block::UnorderedItem(text) => {
            format!(r#"<li class="report-item">{}</li>"#, inline(text))
        }
        Block::Paragraph(text) => format!(r#"<p class="report-paragraph">{}</p>"#, inline(text)),
        Block::Table(table) => render_table(table),
        Block::Blank => String::new(),
    }
}

/// Convert `**bold**` spans anywhere in the text.
pub fn inline(text: &str) -> Cow<'_, str> {
    RE_BOLD.replace_all(text, r#"<strong class="report-strong">$1</strong>"#)
}

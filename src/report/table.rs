//! Pipe tables: parsing a buffered run of `|` lines and rendering it as HTML.
//!
//! Tables in a diagnosis report come in two shapes. Ordinary tables have a
//! header row followed by a `---` divider. SWOT (DAFO) matrices repeat the
//! category labels as in-body rows (`| Fortaleses | Oportunitats |` then the
//! lists, then `| Debilitats | Amenaces |` ...), so a SWOT table gets no
//! header row at all and every row is rendered as data.

use super::style::{self, CellStyle};
use std::fmt::Write as _;

/// Marker that turns a cell into a list of sub-items.
const LIST_MARKER: &str = "- ";

/// Row substring that marks an intentionally empty cell.
const EXPLICIT_BLANK: &str = "||";

/// A parsed table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableBlock {
    /// Header cells; `None` for SWOT tables.
    pub header: Option<Vec<String>>,
    /// Data rows, dividers excluded.
    pub rows: Vec<Vec<String>>,
    /// Whether any row names a SWOT category.
    pub swot: bool,
}

impl TableBlock {
    /// Parse contiguous pipe-prefixed lines. Never fails; rows that yield no
    /// cells are skipped.
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Self {
        let swot = lines
            .iter()
            .any(|l| style::category_of(l.as_ref()).is_some());

        let mut rows = lines
            .iter()
            .map(|l| l.as_ref().trim())
            .filter(|l| !is_divider(l))
            .map(split_cells)
            .filter(|cells| !cells.is_empty());

        let header = if swot { None } else { rows.next() };

        Self {
            header,
            rows: rows.collect(),
            swot,
        }
    }
}

/// Markdown divider row (`| --- | :---: |`).
pub fn is_divider(row: &str) -> bool {
    row.contains("---")
}

/// Split one row into cleaned cells.
///
/// One leading and one trailing pipe are delimiters, not cells. Empty cells
/// are split artifacts and dropped, except when the row contains `||`, which
/// the author uses to mark a deliberately blank cell.
pub fn split_cells(row: &str) -> Vec<String> {
    let row = row.trim();
    let keep_blank = row.contains(EXPLICIT_BLANK);
    let inner = row.strip_prefix('|').unwrap_or(row);
    let inner = inner.strip_suffix('|').unwrap_or(inner);

    inner
        .split('|')
        .map(clean_cell)
        .filter(|c| keep_blank || !c.is_empty())
        .collect()
}

/// Trim a cell and strip bold markup. Idempotent.
pub fn clean_cell(cell: &str) -> String {
    cell.trim().replace("**", "").trim().to_string()
}

/// Render a parsed table. An empty body still yields a valid table.
pub fn render_table(table: &TableBlock) -> String {
    let table_class = if table.swot {
        "report-table swot-table"
    } else {
        "report-table"
    };
    let mut html = format!(r#"<div class="report-table-wrap"><table class="{table_class}">"#);

    if let Some(header) = &table.header {
        html.push_str(r#"<thead><tr class="report-head-row">"#);
        for cell in header {
            let _ = write!(html, r#"<th class="report-th">{cell}</th>"#);
        }
        html.push_str("</tr></thead>");
    }

    html.push_str("<tbody>");
    for row in &table.rows {
        let label_row = table.swot && row.iter().any(|c| style::category_of(c).is_some());
        let row_class = if label_row {
            "report-row swot-label-row"
        } else {
            "report-row"
        };
        let _ = write!(html, r#"<tr class="{row_class}">"#);
        for cell in row {
            let style = CellStyle::for_cell(cell, table.swot);
            let icon = style
                .category
                .map(|c| format!(r#"<span class="swot-icon">{}</span> "#, c.icon()))
                .unwrap_or_default();
            let _ = write!(
                html,
                r#"<td class="{}">{}{}</td>"#,
                style.class_attr(),
                icon,
                render_cell_content(cell)
            );
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table></div>");
    html
}

/// Render cell text, expanding an in-cell list one level deep.
///
/// `"- Risc: sobrecost - Termini curt"` becomes a labeled sub-block
/// (`Risc` / `sobrecost`) and a plain bullet line. Text before the first
/// marker is kept as a lead line.
pub fn render_cell_content(cell: &str) -> String {
    if !cell.contains(LIST_MARKER) {
        return cell.to_string();
    }

    let mut parts = cell.split(LIST_MARKER);
    let mut html = String::new();

    let lead = trim_breaks(parts.next().unwrap_or_default());
    if !lead.is_empty() {
        let _ = write!(html, r#"<div class="cell-lead">{lead}</div>"#);
    }

    for item in parts.map(trim_breaks).filter(|i| !i.is_empty()) {
        match item.split_once(':') {
            Some((label, description)) if !label.trim().is_empty() => {
                let _ = write!(
                    html,
                    r#"<div class="cell-item"><span class="cell-label">{}</span> <span class="cell-desc">{}</span></div>"#,
                    label.trim(),
                    description.trim()
                );
            }
            _ => {
                let _ = write!(html, r#"<div class="cell-bullet">• {item}</div>"#);
            }
        }
    }
    html
}

/// Trim whitespace and `<br>` line-break tags from both ends.
fn trim_breaks(text: &str) -> &str {
    const BREAKS: [&str; 3] = ["<br>", "<br/>", "<br />"];
    let mut text = text.trim();
    loop {
        let before = text.len();
        for br in BREAKS {
            text = text.strip_prefix(br).unwrap_or(text).trim();
            text = text.strip_suffix(br).unwrap_or(text).trim();
        }
        if text.len() == before {
            return text;
        }
    }
}
